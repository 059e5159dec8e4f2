//! Print the environment lines that gate the Budstagram admin area.
//!
//! Prompts for the Basic-auth user name and password, then emits
//! `ADMIN_USER` and a bcrypt `ADMIN_PASSWORD_HASH` ready for `.env`.
//!
//! Usage:
//!     cargo run -p budstagram-scripts --bin generate_admin_hash [cost]

use std::io::{self, BufRead, Write};

const DEFAULT_COST: u32 = 12;

fn prompt(stdin: &mut impl BufRead, label: &str) -> io::Result<String> {
    print!("{label}\n> ");
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> io::Result<()> {
    let cost = std::env::args()
        .nth(1)
        .and_then(|c| c.parse::<u32>().ok())
        .unwrap_or(DEFAULT_COST);

    let mut stdin = io::stdin().lock();

    let user = prompt(&mut stdin, "Admin user name:")?;
    if user.is_empty() || user.contains(':') {
        eprintln!("error: user name must be non-empty and must not contain ':'");
        std::process::exit(1);
    }

    let password = prompt(&mut stdin, "Admin password:")?;
    if password.is_empty() {
        eprintln!("error: password cannot be empty");
        std::process::exit(1);
    }

    if prompt(&mut stdin, "Confirm password:")? != password {
        eprintln!("error: passwords do not match");
        std::process::exit(1);
    }

    match bcrypt::hash(&password, cost) {
        Ok(hash) => {
            println!();
            println!("ADMIN_USER=\"{user}\"");
            println!("ADMIN_PASSWORD_HASH=\"{hash}\"");
        }
        Err(e) => {
            eprintln!("error: failed to hash password: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
