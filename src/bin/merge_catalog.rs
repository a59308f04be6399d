use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    catalogs::apps::run_merge_catalog(std::env::args().skip(1))
}
