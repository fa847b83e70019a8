//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ecovida_core` wiring, from
//!   connection bootstrap through the dashboard report.
//! - Keep output deterministic for quick local sanity checks.

use ecovida_core::db::open_db_in_memory;
use ecovida_core::report::dashboard::dashboard_snapshot;

fn main() {
    println!("ecovida_core ping={}", ecovida_core::ping());
    println!("ecovida_core version={}", ecovida_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("db bootstrap failed: {err}");
            std::process::exit(1);
        }
    };

    match dashboard_snapshot(&conn) {
        Ok(snapshot) => println!(
            "dashboard communities={} residents={} initiatives={}",
            snapshot.total_communities, snapshot.total_residents, snapshot.total_initiatives
        ),
        Err(err) => {
            eprintln!("dashboard report failed: {err}");
            std::process::exit(1);
        }
    }
}
