//! Promote an existing user to the admin role.
//!
//! Usage: cargo run --bin promote-admin <EMAIL>

use portfolio_api::db::{self, users};
use std::env;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let email = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin promote-admin <EMAIL>");
        std::process::exit(1);
    });

    let pool = match db::init_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match users::set_role(pool.as_ref(), &email, "admin").await {
        Ok(0) => {
            eprintln!("User not found: {}", email);
            std::process::exit(1);
        }
        Ok(_) => {
            println!("User role updated to admin: {}", email);
        }
        Err(e) => {
            eprintln!("Failed to update role: {}", e);
            std::process::exit(1);
        }
    }
}
