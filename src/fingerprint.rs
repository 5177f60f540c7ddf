//! 128-bit input fingerprints for output caching.
//!
//! Two FNV-1a streams with different offsets hash the same canonical byte
//! sequence. Inputs are hashed through their JSON form with object keys
//! sorted, so field order never affects the result.

use serde::Serialize;
use serde_json::Value;

use crate::color::ColorPalette;
use crate::context::{RuntimeContext, SurfaceTemplate};
use crate::state::EffectState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Fingerprint of every input that affects a composed bundle.
pub fn fingerprint_inputs(
    state: &EffectState,
    palette: &ColorPalette,
    template: &SurfaceTemplate,
    runtime: &RuntimeContext,
    seed: u64,
) -> Fingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_serialized_pair(&mut a, &mut b, state);
    write_serialized_pair(&mut a, &mut b, palette);
    write_serialized_pair(&mut a, &mut b, template);
    write_serialized_pair(&mut a, &mut b, runtime);
    write_u64_pair(&mut a, &mut b, seed);

    Fingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_serialized_pair<T: Serialize>(a: &mut Fnv1a64, b: &mut Fnv1a64, value: &T) {
    // Plain data records; non-finite floats become null rather than failing.
    let value = serde_json::to_value(value).unwrap_or_default();
    write_json_value_pair(a, b, &value);
}

fn write_json_value_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: &Value) {
    match v {
        Value::Null => write_u8_pair(a, b, 0),
        Value::Bool(x) => {
            write_u8_pair(a, b, 1);
            write_u8_pair(a, b, u8::from(*x));
        }
        Value::Number(n) => {
            write_u8_pair(a, b, 2);
            write_str_pair(a, b, &n.to_string());
        }
        Value::String(s) => {
            write_u8_pair(a, b, 3);
            write_str_pair(a, b, s);
        }
        Value::Array(items) => {
            write_u8_pair(a, b, 4);
            write_u64_pair(a, b, items.len() as u64);
            for item in items {
                write_json_value_pair(a, b, item);
            }
        }
        Value::Object(map) => {
            write_u8_pair(a, b, 5);
            let mut keys = map.keys().collect::<Vec<_>>();
            keys.sort();
            write_u64_pair(a, b, keys.len() as u64);
            for k in keys {
                write_str_pair(a, b, k);
                write_json_value_pair(a, b, &map[k]);
            }
        }
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> (EffectState, ColorPalette, SurfaceTemplate, RuntimeContext) {
        (
            EffectState::default(),
            ColorPalette::default(),
            SurfaceTemplate::default(),
            RuntimeContext::default(),
        )
    }

    #[test]
    fn identical_inputs_match() {
        let (s, p, t, r) = inputs();
        assert_eq!(
            fingerprint_inputs(&s, &p, &t, &r, 42),
            fingerprint_inputs(&s.clone(), &p.clone(), &t.clone(), &r, 42)
        );
    }

    #[test]
    fn every_input_participates() {
        let (s, p, t, r) = inputs();
        let base = fingerprint_inputs(&s, &p, &t, &r, 42);

        let mut hover = s.clone();
        hover.hover.enabled = true;
        assert_ne!(base, fingerprint_inputs(&hover, &p, &t, &r, 42));

        let dark = ColorPalette {
            background: "#000000".into(),
            ..p.clone()
        };
        assert_ne!(base, fingerprint_inputs(&s, &dark, &t, &r, 42));

        let rounder = SurfaceTemplate {
            corner_radius: 24.0,
            ..t.clone()
        };
        assert_ne!(base, fingerprint_inputs(&s, &p, &rounder, &r, 42));

        assert_ne!(base, fingerprint_inputs(&s, &p, &t, &r.mobile(), 42));
        assert_ne!(base, fingerprint_inputs(&s, &p, &t, &r, 43));
    }

    #[test]
    fn object_key_order_does_not_matter() {
        let mut a1 = Fnv1a64::new(0xcbf29ce484222325);
        let mut b1 = Fnv1a64::new(0x9ae16a3b2f90404f);
        let mut a2 = a1;
        let mut b2 = b1;
        write_json_value_pair(&mut a1, &mut b1, &serde_json::json!({ "x": 1, "y": [true, null] }));
        write_json_value_pair(&mut a2, &mut b2, &serde_json::json!({ "y": [true, null], "x": 1 }));
        assert_eq!((a1.finish(), b1.finish()), (a2.finish(), b2.finish()));
    }
}
