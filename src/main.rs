use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    docchat::cli::main()
}
