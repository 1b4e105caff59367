use arrayvec::ArrayVec;
use sbat::{ArrayMetadata, ArrayRevocations, ValidationResult};

fn main() {
    let mut metadata = ArrayMetadata::<8>::new(ArrayVec::new());
    metadata
        .parse(b"shim,1,UEFI shim,shim,1,https://github.com/rhboot/shim\n")
        .unwrap();

    let mut revocations = ArrayRevocations::<8>::new(ArrayVec::new());
    revocations.parse(b"sbat,1,2023012900\nshim,2\n").unwrap();

    match revocations.validate_metadata(&metadata) {
        ValidationResult::Allowed => println!("image allowed"),
        ValidationResult::Revoked(entry) => println!("image revoked by: {}", entry.component),
    }
}
