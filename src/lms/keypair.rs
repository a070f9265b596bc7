use signature::Keypair;

use crate::lms::private::SigningKey;
use crate::lms::public::VerifyingKey;

// implements the Keypair trait for SigningKey
impl Keypair for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn verifying_key(&self) -> Self::VerifyingKey {
        self.public()
    }
}
