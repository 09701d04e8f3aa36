//! Stamps the build date into the `alembic-xform --version` output.
//! `ALEMBIC_BUILD_DATE` / `ALEMBIC_BUILD_TIME` override it for reproducible builds.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'_>] = format_description!("[hour]:[minute]:[second] UTC");

fn stamp(var: &str, now: OffsetDateTime, format: &[FormatItem<'_>]) -> String {
    println!("cargo:rerun-if-env-changed={var}");
    std::env::var(var)
        .unwrap_or_else(|_| now.format(format).unwrap_or_else(|_| "unknown".to_string()))
}

fn main() {
    let now = OffsetDateTime::now_utc();
    let date = stamp("ALEMBIC_BUILD_DATE", now, DATE_FORMAT);
    let time = stamp("ALEMBIC_BUILD_TIME", now, TIME_FORMAT);
    println!("cargo:rustc-env=ALEMBIC_BUILD_DATE={date}");
    println!("cargo:rustc-env=ALEMBIC_BUILD_TIME={time}");
}
