//! Bookrack Application Library
//!
//! Book-review catalog modules built on the bookrack service kernel.

pub mod modules;
