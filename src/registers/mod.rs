pub mod card_status;
pub mod cid;
pub mod csd;
pub mod ocr;
