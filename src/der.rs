// http://luca.ntop.org/Teaching/Appunti/asn1.html
// https://en.wikipedia.org/wiki/Distinguished_Encoding_Rules#BER_encoding
// https://tools.ietf.org/html/rfc8017#appendix-A.1.1

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x10;

pub type DER = Vec<u8>;

/// PKCS#1 RSAPublicKey.
#[derive(Debug, Clone)]
pub struct RSAPublicKey {
    pub modulus: Integer,
    pub public_exponent: Integer,
}

/// Unsigned big-endian integer.
#[derive(Debug, Clone)]
pub struct Integer(pub Vec<u8>);

fn trim_bytes(bytes: &[u8]) -> Vec<u8> {
    // Remove leading zeros from an array.
    match bytes.iter().position(|&x| x != 0) {
        Some(n) => bytes[n..].to_vec(),
        None => vec![0],
    }
}

fn encode(tag: u8, constructed: bool, contents: Vec<u8>) -> Vec<u8> {
    // prepare an ASN1 tag-length-value
    let id = tag
        // set bit for constructed (vs primitive)
        | match constructed {
            true => 0x20,
            false => 0,
        };
    let len = contents.len();
    let len_bytes = trim_bytes(&len.to_be_bytes());
    if len <= 127 {
        return [vec![id, len_bytes[0]], contents].concat();
    }
    // to_be_bytes of a usize is at most 8 bytes, so the long form length fits in one byte.
    let len_len = len_bytes.len() as u8;
    [vec![id, 0x80 | len_len], len_bytes, contents].concat()
}

impl From<Integer> for DER {
    fn from(integer: Integer) -> Self {
        let mut bytes = trim_bytes(&integer.0);
        // Keep the value positive in two's complement.
        if bytes[0] & 0x80 != 0 {
            bytes.insert(0, 0);
        }
        encode(TAG_INTEGER, false, bytes)
    }
}

impl From<RSAPublicKey> for DER {
    fn from(key: RSAPublicKey) -> Self {
        encode(
            TAG_SEQUENCE,
            true,
            [DER::from(key.modulus), DER::from(key.public_exponent)].concat(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_integer() {
        let integer = Integer(vec![5]);
        // 0x02: Integer type
        // 0x01: Content length of one byte
        // 0x05: The integer 5
        let expected = vec![0x02, 0x01, 0x05];
        assert_eq!(DER::from(integer), expected);
    }

    #[test]
    fn encode_integer_high_bit() {
        assert_eq!(DER::from(Integer(vec![0x00, 0x80])), vec![0x02, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn encode_long_length() {
        let contents = vec![0x01; 200];
        let der = encode(TAG_INTEGER, false, contents);
        assert_eq!(&der[..3], &[0x02, 0x81, 200]);
        assert_eq!(der.len(), 203);
    }

    #[test]
    fn encode_rsa_public_key() {
        let key = RSAPublicKey {
            modulus: Integer(vec![0xc1, 0x02]),
            public_exponent: Integer(vec![0x01, 0x00, 0x01]),
        };
        assert_eq!(
            DER::from(key),
            vec![0x30, 0x0a, 0x02, 0x03, 0x00, 0xc1, 0x02, 0x02, 0x03, 0x01, 0x00, 0x01]
        );
    }
}
