/// Local filesystem reads, directory listing, and atomic replacement.
pub mod fs;
