/// Display version information
pub fn execute() {
    println!("hubcast {}", env!("CARGO_PKG_VERSION"));
    println!("Client CLI for hub-relayed social protocol actions");
}
