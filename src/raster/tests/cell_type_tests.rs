//! Tests for cell types and target type selection

extern crate std;

use crate::raster::{determine_target_cell_type, suggest_no_data_value, CellType, MosaicError};

#[test]
fn test_cell_type_names_round_trip() {
    for cell_type in CellType::ALL {
        std::assert_eq!(cell_type.name().parse::<CellType>().unwrap(), cell_type);
    }
    std::assert_eq!("16BIT-U".parse::<CellType>().unwrap(), CellType::SixteenBitUnsigned);
    std::assert!("12bit".parse::<CellType>().is_err());
}

#[test]
fn test_sample_sizes() {
    std::assert_eq!(CellType::OneBit.bytes_per_sample(), 1);
    std::assert_eq!(CellType::FourBit.bits_per_sample(), 4);
    std::assert!(CellType::FourBit.is_sub_byte());
    std::assert_eq!(CellType::ThirtyTwoBitReal.bytes_per_sample(), 4);
    std::assert_eq!(CellType::SixtyFourBitReal.bytes_per_sample(), 8);
}

#[test]
fn test_can_represent() {
    std::assert!(CellType::EightBitUnsigned.can_represent(255.0));
    std::assert!(!CellType::EightBitUnsigned.can_represent(256.0));
    std::assert!(!CellType::EightBitUnsigned.can_represent(-1.0));
    std::assert!(!CellType::SixteenBitSigned.can_represent(1.5));
    std::assert!(CellType::ThirtyTwoBitReal.can_represent(1.5));
    std::assert!(CellType::ThirtyTwoBitReal.can_represent(f64::NAN));
    std::assert!(!CellType::ThirtyTwoBitSigned.can_represent(f64::NAN));
}

#[test]
fn test_target_cell_type_promotion_chain() {
    std::assert_eq!(determine_target_cell_type(CellType::EightBitUnsigned, &[]).unwrap(), CellType::EightBitUnsigned);
    std::assert_eq!(determine_target_cell_type(CellType::EightBitUnsigned, &[255.0]).unwrap(), CellType::EightBitUnsigned);
    std::assert_eq!(determine_target_cell_type(CellType::EightBitUnsigned, &[256.0]).unwrap(), CellType::SixteenBitUnsigned);
    std::assert_eq!(determine_target_cell_type(CellType::EightBitUnsigned, &[-1.0]).unwrap(), CellType::SixtyFourBitReal);
    std::assert_eq!(determine_target_cell_type(CellType::OneBit, &[2.0]).unwrap(), CellType::EightBitUnsigned);
    std::assert_eq!(determine_target_cell_type(CellType::SixteenBitSigned, &[40000.0]).unwrap(), CellType::ThirtyTwoBitSigned);
    std::assert_eq!(determine_target_cell_type(CellType::ThirtyTwoBitReal, &[f64::MAX]).unwrap(), CellType::SixtyFourBitReal);
}

#[test]
fn test_target_cell_type_gives_up_past_real() {
    let err = determine_target_cell_type(CellType::SixtyFourBitReal, &[f64::INFINITY]).unwrap_err();
    std::assert!(std::matches!(err, MosaicError::InvalidNoData { .. }));
}

#[test]
fn test_suggest_no_data_value() {
    std::assert_eq!(suggest_no_data_value(CellType::EightBitUnsigned, 10.0, 200.0), 9.0);
    std::assert_eq!(suggest_no_data_value(CellType::EightBitUnsigned, 0.0, 200.0), 201.0);
    std::assert_eq!(suggest_no_data_value(CellType::EightBitUnsigned, 0.0, 255.0), 256.0);
    std::assert_eq!(suggest_no_data_value(CellType::SixteenBitSigned, -32768.0, 32767.0), -32769.0);
    std::assert_eq!(suggest_no_data_value(CellType::ThirtyTwoBitReal, 0.0, 1.0), f32::MIN as f64);
}
