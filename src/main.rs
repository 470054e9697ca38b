fn main() {
    match autotidy::run() {
        Ok(code) => std::process::exit(code.as_u8() as i32),
        Err(e) => {
            eprintln!("autotidy: {e:#}");
            std::process::exit(1);
        }
    }
}
