fn main() -> Result<(), Box<dyn std::error::Error>> {
    headstart::cli::main()
}
