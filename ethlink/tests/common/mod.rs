use std::{fs::File, io::Read};

/// Load a capture stored as a hex string under `tests/packet_examples`.
pub fn file_to_packet(fname: &str) -> Vec<u8> {
    // Cargo runs integration tests from the crate root.
    let mut program_path = std::env::current_dir().unwrap();
    program_path.push("tests");
    program_path.push("packet_examples");
    program_path.push(fname);

    let mut file = File::open(program_path).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    hex_to_bytes(content.trim())
}

/// Decode a string of hex digit pairs, ignoring whitespace.
pub fn hex_to_bytes(s: &str) -> Vec<u8> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    assert!(digits.len() % 2 == 0, "odd number of hex digits");
    digits
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect()
}
