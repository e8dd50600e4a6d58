use packed_struct::{prelude::*, types::bits::Bits};

use crate::geometry::TracePoint;

/// Every header and point travels as one 6-byte word
pub type Word = [u8; 6];

/// Trait to calculate checksum before packing the struct
pub trait CheckSum {
    /// Parity of every bit in the message. Setting the checksum bit to this
    /// value leaves the packed word with an even number of set bits.
    fn calculate_checksum(&self, message: &[u8]) -> bool {
        let folded = message.iter().fold(0u8, |acc, byte| acc ^ byte);
        folded.count_ones() % 2 == 1
    }

    fn checksum_pack(&mut self) -> Result<Word, PackingError>;
}

// word # | Bits & Definition
// Header:
// 0      | 0xF8_0000_0000_00 = Effect ID (0 when no effect slot applies)
//        | 0x04_0000_0000_00 = Blank frame
//        | 0x00_FFFF_0000_00 = Point Count
//        | 0x00_0000_FFFF_00 = Point Period (microseconds)
//        | 0x00_0000_0000_01 = Checksum
#[derive(PackedStruct, Default, Debug, PartialEq, Clone)]
#[packed_struct(bit_numbering = "msb0")]
pub struct HeaderPack {
    #[packed_field(bits = "0..=4")]
    pub effect_id: Integer<u8, Bits<5>>,
    #[packed_field(bits = "5")]
    pub blank: bool,
    #[packed_field(bits = "6..=7")]
    pub _reserved: ReservedZero<packed_bits::Bits<2>>,
    #[packed_field(bits = "8..=23", endian = "msb")]
    pub point_count: Integer<u16, Bits<16>>,
    #[packed_field(bits = "24..=39", endian = "msb")]
    pub point_period_us: Integer<u16, Bits<16>>,
    #[packed_field(bits = "40..=46")]
    pub _reserved_tail: ReservedZero<packed_bits::Bits<7>>,
    #[packed_field(bits = "47")]
    pub checksum: bool,
}

impl CheckSum for HeaderPack {
    fn checksum_pack(&mut self) -> Result<Word, PackingError> {
        self.checksum = false;
        self.checksum = self.calculate_checksum(&self.pack()?);
        self.pack()
    }
}

// word # | Bits & Definition
// Point:
// 1 -> n | 0xFF_0000_0000_00 = X DAC code
//        | 0x00_FF00_0000_00 = Y DAC code
//        | 0x00_00FF_0000_00 = Red
//        | 0x00_0000_FF00_00 = Green
//        | 0x00_0000_00FF_00 = Blue
//        | 0x00_0000_0000_80 = Blank
//        | 0x00_0000_0000_01 = Checksum
#[derive(PackedStruct, Default, Debug, PartialEq, Clone)]
#[packed_struct(bit_numbering = "msb0")]
pub struct PointPack {
    #[packed_field(bits = "0..=7")]
    pub x: Integer<u8, Bits<8>>,
    #[packed_field(bits = "8..=15")]
    pub y: Integer<u8, Bits<8>>,
    #[packed_field(bits = "16..=23")]
    pub red: Integer<u8, Bits<8>>,
    #[packed_field(bits = "24..=31")]
    pub green: Integer<u8, Bits<8>>,
    #[packed_field(bits = "32..=39")]
    pub blue: Integer<u8, Bits<8>>,
    #[packed_field(bits = "40")]
    pub blank: bool,
    #[packed_field(bits = "41..=46")]
    pub _reserved: ReservedZero<packed_bits::Bits<6>>,
    #[packed_field(bits = "47")]
    pub checksum: bool,
}

impl CheckSum for PointPack {
    fn checksum_pack(&mut self) -> Result<Word, PackingError> {
        self.checksum = false;
        self.checksum = self.calculate_checksum(&self.pack()?);
        self.pack()
    }
}

impl From<&TracePoint> for PointPack {
    fn from(sample: &TracePoint) -> Self {
        let (x, y) = sample.point.to_dac();
        let color = sample.color;

        PointPack {
            x: x.into(),
            y: y.into(),
            red: color.red.into(),
            green: color.green.into(),
            blue: color.blue.into(),
            blank: color.is_off(),
            ..Default::default()
        }
    }
}
