#![deny(rust_2018_idioms)]

#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate lazy_static;

#[cfg(test)]
#[macro_use]
pub mod test_utils;

#[macro_use]
mod macros;

pub mod branch;
pub mod checkout;
pub mod cherrypick;
pub mod cmd;
pub mod commit;
pub mod diff;
pub mod error;
pub mod hash;
pub mod index;
pub mod merge;
pub mod obj;
pub mod refs;
pub mod repo;
pub mod reset;
pub mod rev;
pub mod serialize;
pub mod status;
pub mod xdiff;

mod io;
mod lockfile;
mod odb;
mod path;
mod signature;
mod time;

pub use signature::{RitEpochTime, RitSignature, RitTime, RitTimeZoneOffset};
