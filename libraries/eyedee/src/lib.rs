//! Random identifiers.
//!
//! [`get_uuid`] returns a hyphenated v4 UUID. [`auto_id`] returns the short
//! alphanumeric form that document stores hand out for newly created documents.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use uuid::Uuid;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["self", "crypto"])]
    fn randomUUID() -> String;
}

/// Length of the ids produced by [`auto_id`].
pub const AUTO_ID_LEN: usize = 20;

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn get_uuid() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        randomUUID()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Uuid::new_v4().to_string()
    }
}

/// A 20 character alphanumeric id, drawn from the random bits of a v4 UUID.
pub fn auto_id() -> String {
    let hex: String = get_uuid().chars().filter(|c| *c != '-').collect();
    let mut value = u128::from_str_radix(&hex, 16).unwrap_or_default();
    let base = AUTO_ID_ALPHABET.len() as u128;

    (0..AUTO_ID_LEN)
        .map(|_| {
            let c = AUTO_ID_ALPHABET[(value % base) as usize];
            value /= base;
            c as char
        })
        .collect()
}
