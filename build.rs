use time::macros::format_description;
use time::OffsetDateTime;

/// Stamp BSOR_BUILD_DATE / BSOR_BUILD_TIME for `bsor-cli --version`.
///
/// `SOURCE_DATE_EPOCH` pins the stamp for reproducible builds; explicit
/// BSOR_BUILD_* variables win over both.
fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let stamp = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(OffsetDateTime::now_utc);

    let date = std::env::var("BSOR_BUILD_DATE").unwrap_or_else(|_| {
        stamp
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| "unknown".to_string())
    });
    let time = std::env::var("BSOR_BUILD_TIME").unwrap_or_else(|_| {
        stamp
            .format(format_description!("[hour]:[minute]:[second] UTC"))
            .unwrap_or_else(|_| "unknown".to_string())
    });

    println!("cargo:rustc-env=BSOR_BUILD_DATE={}", date);
    println!("cargo:rustc-env=BSOR_BUILD_TIME={}", time);
}
