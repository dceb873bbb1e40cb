//! Fuzz target for the gate's submission path
//!
//! Prevent authentication bypass via crafted submissions
//!
//! # Strategy
//!
//! - Arbitrary byte submissions: garbage, embedded NULs, long inputs,
//!   non-UTF-8 sequences run through the same lossy decoding the server
//!   applies
//! - Sequences of submissions against one gate, interleaving the true
//!   pre-image with noise
//!
//! # Invariants
//!
//! - NEVER panic on any submission
//! - A submission is accepted only if it hashes to the current expectation
//! - An accept replaces the expectation with the submitted pre-image
//! - A rejection leaves the expectation unchanged

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use turnstile_core::{Gate, MemoryExpectationStore, Otp, Verdict, derive};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    pre_image: Vec<u8>,
    submissions: Vec<Vec<u8>>,
}

fuzz_target!(|input: FuzzInput| {
    let pre_image = String::from_utf8_lossy(&input.pre_image).into_owned();
    let expected = derive(pre_image.as_bytes());

    let store = MemoryExpectationStore::new(expected.clone());
    let mut gate = Gate::new(expected, store);

    for raw in &input.submissions {
        let submitted = String::from_utf8_lossy(raw).into_owned();
        let before = gate.expected().clone();

        let Ok(verdict) = gate.submit(&submitted) else {
            panic!("memory store never fails");
        };

        match verdict {
            Verdict::Accepted => {
                assert_eq!(derive(submitted.as_bytes()), before);
                assert_eq!(gate.expected(), &Otp::from(submitted.as_str()));
            },
            Verdict::Rejected => {
                assert_eq!(gate.expected(), &before);
            },
        }
    }
});
