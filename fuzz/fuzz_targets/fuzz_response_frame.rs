#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mfm_modbus::frame::parse_response;
use mfm_modbus::{ByteOrder, ErrorCode};

#[derive(Debug, Arbitrary)]
struct Input {
    frame: [u8; 9],
    slave_id: u8,
    word_swap: bool,
}

fuzz_target!(|input: Input| {
    let order = if input.word_swap {
        ByteOrder::BigEndianSwap
    } else {
        ByteOrder::BigEndian
    };
    match parse_response(&input.frame, input.slave_id, order) {
        Ok(_) => assert!(mfm_modbus::crc::verify(&input.frame)),
        Err(code) => assert!(matches!(
            code,
            ErrorCode::WrongHeaderBytes | ErrorCode::CrcError
        )),
    }
});
