// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro::TokenStream;

mod cif_ack;
mod cif_bit;
mod cif_fields;
mod cif_fixed;
mod cif_fixed_masked;
mod cif_plain;

/// Generates a getter, setter, and unsetter for one bit of a CIF
/// indicator word.
///
/// In format:
///  - `${name}()`: returns the bit state
///  - `set_${name}()`: sets the bit
///  - `unset_${name}()`: clears the bit
#[proc_macro]
pub fn cif_bit(input: TokenStream) -> TokenStream {
    cif_bit::cif_bit(input.into()).into()
}

/// Attribute macro that rewrites a CIF data-field struct so that every
/// member becomes an `Option` guarded by the matching indicator bit,
/// followed (when the `cif7` feature is active) by the attributes that
/// CIF7 multiplies onto the field: a vector of same-size statistics
/// plus separate probability/belief members that are fixed at one
/// 32-bit word regardless of the primary field's type. Also derives a
/// `size_words()` method from each field's type and an `empty()` check.
///
/// Fields of type `TsField` additionally receive the packet timestamp
/// layout as parse context, since their wire width follows the TSI/TSF
/// header modes. Pass `timestamped` as a second argument to add that
/// context to the struct (e.g. `#[cif_fields(cif3, timestamped)]`).
#[proc_macro_attribute]
pub fn cif_fields(attr: TokenStream, item: TokenStream) -> TokenStream {
    cif_fields::cif_fields(attr, item)
}

/// Generates getter/setter implementations for a CIF field whose wire
/// representation is also the user-facing value.
#[proc_macro]
pub fn cif_plain(input: TokenStream) -> TokenStream {
    cif_plain::cif_plain(input.into()).into()
}

/// Generates getter/setter implementations for a CIF field stored as a
/// whole-word fixed-point number. A float type is exposed to the user.
#[proc_macro]
pub fn cif_fixed(input: TokenStream) -> TokenStream {
    cif_fixed::cif_fixed(input.into()).into()
}

/// Generates getter/setter implementations for a CIF field stored as a
/// fixed-point number occupying only part of the wire word (e.g. a
/// 16-bit radix-7 value carried in the low half of a 32-bit field).
#[proc_macro]
pub fn cif_fixed_masked(input: TokenStream) -> TokenStream {
    cif_fixed_masked::cif_fixed_masked(input.into()).into()
}

/// Generates getter/setter implementations for the warning/error
/// response pair a field carries in ACK packets.
#[proc_macro]
pub fn cif_ack(input: TokenStream) -> TokenStream {
    cif_ack::cif_ack(input.into()).into()
}
