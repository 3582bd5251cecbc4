use std::process;

fn main() {
    if let Err(e) = prismq_lib::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
