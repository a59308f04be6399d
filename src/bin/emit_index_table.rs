use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    catalogs::apps::run_emit_index_table(std::env::args().skip(1))
}
