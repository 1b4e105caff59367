use arrayvec::ArrayVec;
use sbat::ArrayMetadata;

fn main() {
    let payload = b"sbat,1,SBAT Version,sbat,1,https://github.com/rhboot/shim/blob/main/SBAT.md\n\
grub,3,Free Software Foundation,grub,2.06,https://www.gnu.org/software/grub/\n";

    let mut metadata = ArrayMetadata::<8>::new(ArrayVec::new());
    metadata.parse(payload).unwrap();

    for entry in metadata.entries() {
        println!("{}", entry.component);
        if let Some(url) = entry.vendor.url {
            println!("  {url}");
        }
    }
}
