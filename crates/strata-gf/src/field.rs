//! Scalar arithmetic in GF(2^8).
//!
//! Elements are plain `u8`. Addition is XOR; multiplication is polynomial
//! multiplication reduced modulo `x^8 + x^4 + x^3 + x^2 + 1` (`0x11D`),
//! computed through log / exp tables built at compile time with generator 2.

/// The irreducible reduction polynomial, including the `x^8` term.
pub const POLYNOMIAL: u16 = 0x11D;

/// `EXP[i] = 2^i`. Doubled in length so `LOG[a] + LOG[b]` never needs a modulo.
static EXP: [u8; 512] = build_exp();

/// `LOG[2^i] = i`. `LOG[0]` is unused.
static LOG: [u8; 256] = build_log();

const fn build_exp() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log() -> [u8; 256] {
    let exp = build_exp();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Field addition (and subtraction): XOR.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
}

/// Multiplicative inverse. Zero has none.
#[inline]
pub fn inv(a: u8) -> Option<u8> {
    if a == 0 {
        return None;
    }
    Some(EXP[255 - LOG[a as usize] as usize])
}

/// Field division `a / b`. Returns `None` when `b` is zero.
#[inline]
pub fn div(a: u8, b: u8) -> Option<u8> {
    let b_inv = inv(b)?;
    Some(mul(a, b_inv))
}

/// Raise `a` to the `n`-th power. `0^0` is 1.
pub fn pow(a: u8, n: usize) -> u8 {
    if n == 0 {
        return 1;
    }
    if a == 0 {
        return 0;
    }
    EXP[(LOG[a as usize] as usize * n) % 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shift-and-add reference multiply, independent of the tables.
    fn mul_reference(mut a: u8, mut b: u8) -> u8 {
        let mut product = 0u8;
        while b != 0 {
            if b & 1 != 0 {
                product ^= a;
            }
            let carry = a & 0x80 != 0;
            a <<= 1;
            if carry {
                a ^= (POLYNOMIAL & 0xFF) as u8;
            }
            b >>= 1;
        }
        product
    }

    #[test]
    fn test_mul_matches_reference() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(mul(a, b), mul_reference(a, b), "a={a} b={b}");
            }
        }
    }

    #[test]
    fn test_exp_table_cycles() {
        // 2 generates the whole multiplicative group.
        let mut seen = [false; 256];
        for &value in &EXP[..255] {
            assert!(!seen[value as usize], "duplicate {value}");
            seen[value as usize] = true;
        }
        assert!(!seen[0]);
    }

    #[test]
    fn test_inverse() {
        assert_eq!(inv(0), None);
        for a in 1..=255u8 {
            let a_inv = inv(a).unwrap();
            assert_eq!(mul(a, a_inv), 1, "a={a}");
        }
    }

    #[test]
    fn test_div() {
        assert_eq!(div(7, 0), None);
        assert_eq!(div(0, 9), Some(0));
        for a in 1..=255u8 {
            assert_eq!(div(mul(a, 0x53), 0x53), Some(a));
        }
    }

    #[test]
    fn test_add_is_self_inverse() {
        assert_eq!(add(0x53, 0x53), 0);
        assert_eq!(add(0x53, 0), 0x53);
    }

    #[test]
    fn test_pow() {
        assert_eq!(pow(0, 0), 1);
        assert_eq!(pow(0, 3), 0);
        assert_eq!(pow(2, 8), 0x1D);
        assert_eq!(pow(3, 255), 1);
        let mut acc = 1u8;
        for n in 0..20 {
            assert_eq!(pow(0x8E, n), acc);
            acc = mul(acc, 0x8E);
        }
    }
}
