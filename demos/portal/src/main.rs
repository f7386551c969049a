use rollcall::prelude::*;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

struct Args {
    data_dir: String,
    sign_out: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        data_dir: rollcall::DEFAULT_DATA_DIR.to_string(),
        sign_out: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--sign-out" => args.sign_out = true,
            dir => args.data_dir = dir.to_string(),
        }
    }
    args
}

// ---------------------------------------------------------------------------
// Portal
// ---------------------------------------------------------------------------

fn greet(session: &SessionStore<FileStore>) {
    match session.profile() {
        Some(profile) => match profile.student() {
            Some(details) => println!(
                "{} ({}) roll={} branch={} year={}",
                profile.name(),
                profile.role(),
                details.roll_number.as_deref().unwrap_or("-"),
                details.branch.as_deref().unwrap_or("-"),
                details.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
            ),
            None => println!("{} ({})", profile.name(), profile.role()),
        },
        None => println!("{} ({})", session.display_name(), session.role_label()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = parse_args();

    let session = RollcallBuilder::new().data_dir(&args.data_dir).open().await?;

    if session.is_authenticated() {
        tracing::info!(dir = %args.data_dir, "restored saved session");
    } else {
        // A one-character name is rejected; show what the caller gets back.
        let rejected = Outcome::from(session.sign_in(ProfileFields::student("P")).await);
        println!("rejected sign-in: {}", serde_json::to_string(&rejected)?);

        session
            .sign_in(
                ProfileFields::student("Priya")
                    .with_roll_number("21CS042")
                    .with_branch("CSE")
                    .with_year(1),
            )
            .await?;
    }
    greet(&session);

    if session.is_student() {
        let year = session
            .profile()
            .and_then(|p| p.student().and_then(|s| s.year))
            .unwrap_or(0);
        let next = (i64::from(year) % 4) + 1;
        session
            .update_profile(ProfileFields::new().with_year(next))
            .await?;
        greet(&session);
    }

    if args.sign_out {
        session.sign_out().await;
        greet(&session);
    }

    Ok(())
}
