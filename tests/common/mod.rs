#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use finplan_core::{clock::FixedClock, storage::JsonStore, Session};
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Temporary data directory; the directory lives as long as the returned guard.
pub fn temp_store_path() -> (PathBuf, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("finplan.json");
    (path, temp)
}

/// Opens a fresh session over the JSON store at `path`, as an application start would.
pub fn open_session(path: &Path, today: NaiveDate) -> Session {
    let store = JsonStore::open(path).expect("open json store");
    let mut session = Session::new(Box::new(store), Box::new(FixedClock::on(today)), "INR");
    session.load().expect("load session");
    session
}
