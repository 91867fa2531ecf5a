use core::fmt;

use bit_field::BitField;

/// Card identification register, register layout (see `Response`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CidRegister(pub [u32; 4]);

impl CidRegister {
    /// MID [127:120]
    pub fn manufacturer_id(&self) -> u8 {
        self.0[3].get_bits(24..32) as u8
    }

    /// OID [119:104]
    pub fn oem_id(&self) -> u16 {
        self.0[3].get_bits(8..24) as u16
    }

    /// PNM [103:64], first character in the most significant byte
    pub fn product_name(&self) -> [u8; 5] {
        [
            self.0[3].get_bits(0..8) as u8,
            self.0[2].get_bits(24..32) as u8,
            self.0[2].get_bits(16..24) as u8,
            self.0[2].get_bits(8..16) as u8,
            self.0[2].get_bits(0..8) as u8,
        ]
    }

    /// PRV [63:56]
    pub fn product_revision(&self) -> u8 {
        self.0[1].get_bits(24..32) as u8
    }

    /// PSN [55:24], split over words 1 and 0
    pub fn serial_number(&self) -> u32 {
        (self.0[1].get_bits(0..24) << 8) | self.0[0].get_bits(24..32)
    }

    /// MDT [19:8]
    pub fn manufacturing_date(&self) -> u16 {
        self.0[0].get_bits(8..20) as u16
    }
}

/// Decoded card identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cid {
    pub manufacturer_id: u8,
    pub oem_id: u16,
    pub product_name: [u8; 5],
    pub product_revision: u8,
    pub serial_number: u32,
    pub manufacturing_month: u8,
    pub manufacturing_year: u16,
}

impl Cid {
    pub fn product_name(&self) -> &str {
        core::str::from_utf8(&self.product_name).unwrap_or("?????")
    }
}

impl From<CidRegister> for Cid {
    fn from(cid: CidRegister) -> Self {
        let date = cid.manufacturing_date();
        Self {
            manufacturer_id: cid.manufacturer_id(),
            oem_id: cid.oem_id(),
            product_name: cid.product_name(),
            product_revision: cid.product_revision(),
            serial_number: cid.serial_number(),
            manufacturing_month: date.get_bits(0..4) as u8,
            manufacturing_year: date.get_bits(4..12) + 2000,
        }
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MID {:#04x} OID {:#06x} PNM {} PRV {}.{} PSN {:#010x} MDT {}/{}",
            self.manufacturer_id,
            self.oem_id,
            self.product_name(),
            self.product_revision >> 4,
            self.product_revision & 0xF,
            self.serial_number,
            self.manufacturing_month,
            self.manufacturing_year,
        )
    }
}

pub fn decode_cid(words: &[u32; 4]) -> Cid {
    CidRegister(*words).into()
}
