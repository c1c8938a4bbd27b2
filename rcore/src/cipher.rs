//! Block cipher capability
//!
//! The padding stream only needs something that can push whole blocks
//! through a keyed cipher. [`BlockCipher`] is that seam, the concrete
//! algorithms come from RustCrypto and are only wired up in CBC mode here.
use aes::cipher::generic_array::GenericArray;
use aes::cipher::BlockCipher as RawBlockCipher;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, BlockSizeUser, KeyInit, KeyIvInit};
use thiserror::Error;

pub const AES_KEY_SIZE: usize = 32;
pub const AES_IV_SIZE: usize = 16;

pub const DES_KEY_SIZE: usize = 8;
pub const DES_IV_SIZE: usize = 8;

pub const TDES_KEY_SIZE: usize = 24;
pub const TDES_IV_SIZE: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("input of {len} bytes is not a multiple of the {block} byte block")]
    Misaligned { len: usize, block: usize },
    #[error("invalid key or iv length")]
    KeyIvLength,
}

/// An already keyed cipher working on whole blocks.
///
/// Both directions append their output to `out` and keep their chaining
/// state between calls, so a long stream can be fed in pieces as long as
/// every piece is block aligned.
pub trait BlockCipher {
    fn block_size(&self) -> usize;
    fn encrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError>;
    fn decrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError>;
}

impl<T: BlockCipher + ?Sized> BlockCipher for Box<T> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        (**self).encrypt(data, out)
    }

    fn decrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        (**self).decrypt(data, out)
    }
}

// Copies data to the tail of out and hands back where it starts
fn stage(data: &[u8], block: usize, out: &mut Vec<u8>) -> Result<usize, CipherError> {
    if data.len() % block != 0 {
        return Err(CipherError::Misaligned { len: data.len(), block });
    }
    let start = out.len();
    out.extend_from_slice(data);
    Ok(start)
}

pub struct CbcCipher<C>
where
    C: RawBlockCipher + BlockEncryptMut + BlockDecryptMut + KeyInit,
{
    enc: cbc::Encryptor<C>,
    dec: cbc::Decryptor<C>,
}

pub type Aes256Cbc = CbcCipher<aes::Aes256>;
pub type DesCbc = CbcCipher<des::Des>;
pub type TdesCbc = CbcCipher<des::TdesEde3>;

impl<C> CbcCipher<C>
where
    C: RawBlockCipher + BlockEncryptMut + BlockDecryptMut + KeyInit,
{
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        Ok(CbcCipher {
            enc: cbc::Encryptor::<C>::new_from_slices(key, iv)
                .map_err(|_| CipherError::KeyIvLength)?,
            dec: cbc::Decryptor::<C>::new_from_slices(key, iv)
                .map_err(|_| CipherError::KeyIvLength)?,
        })
    }
}

impl<C> BlockCipher for CbcCipher<C>
where
    C: RawBlockCipher + BlockEncryptMut + BlockDecryptMut + KeyInit,
{
    fn block_size(&self) -> usize {
        <C as BlockSizeUser>::block_size()
    }

    fn encrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        let block = self.block_size();
        let start = stage(data, block, out)?;

        for chunk in out[start..].chunks_exact_mut(block) {
            self.enc.encrypt_block_mut(GenericArray::from_mut_slice(chunk));
        }
        Ok(())
    }

    fn decrypt(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), CipherError> {
        let block = self.block_size();
        let start = stage(data, block, out)?;

        for chunk in out[start..].chunks_exact_mut(block) {
            self.dec.decrypt_block_mut(GenericArray::from_mut_slice(chunk));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_cbc {
    use super::*;

    // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt
    const NIST_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";
    const NIST_CIPHER: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d";

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn aes256_cbc_vector() {
        let mut cipher = Aes256Cbc::new(&unhex(NIST_KEY), &unhex(NIST_IV)).unwrap();
        assert_eq!(cipher.block_size(), 16);

        let mut out = Vec::new();
        cipher.encrypt(&unhex(NIST_PLAIN), &mut out).unwrap();
        assert_eq!(out, unhex(NIST_CIPHER));
    }

    #[test]
    fn aes256_cbc_chains_across_calls() {
        let plain = unhex(NIST_PLAIN);
        let mut cipher = Aes256Cbc::new(&unhex(NIST_KEY), &unhex(NIST_IV)).unwrap();

        let mut out = Vec::new();
        cipher.encrypt(&plain[..16], &mut out).unwrap();
        cipher.encrypt(&plain[16..], &mut out).unwrap();
        assert_eq!(out, unhex(NIST_CIPHER));

        let mut back = Vec::new();
        cipher.decrypt(&out[..16], &mut back).unwrap();
        cipher.decrypt(&out[16..], &mut back).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn des_and_tdes_roundtrip() {
        let plain = b"sixteen byte msg";

        let mut des = DesCbc::new(&[7u8; DES_KEY_SIZE], &[1u8; DES_IV_SIZE]).unwrap();
        assert_eq!(des.block_size(), 8);
        let mut enc = Vec::new();
        des.encrypt(plain, &mut enc).unwrap();
        assert_ne!(&enc[..], &plain[..]);
        let mut dec = Vec::new();
        des.decrypt(&enc, &mut dec).unwrap();
        assert_eq!(&dec[..], &plain[..]);

        let key: Vec<u8> = (0..TDES_KEY_SIZE as u8).collect();
        let mut tdes = TdesCbc::new(&key, &[2u8; TDES_IV_SIZE]).unwrap();
        assert_eq!(tdes.block_size(), 8);
        let mut enc = Vec::new();
        tdes.encrypt(plain, &mut enc).unwrap();
        let mut dec = Vec::new();
        tdes.decrypt(&enc, &mut dec).unwrap();
        assert_eq!(&dec[..], &plain[..]);
    }

    #[test]
    fn misaligned_input() {
        let mut cipher = Aes256Cbc::new(&[0u8; AES_KEY_SIZE], &[0u8; AES_IV_SIZE]).unwrap();
        let mut out = Vec::new();

        assert_eq!(
            cipher.encrypt(&[0u8; 15], &mut out),
            Err(CipherError::Misaligned { len: 15, block: 16 })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn bad_key_length() {
        assert_eq!(
            Aes256Cbc::new(&[0u8; 16], &[0u8; AES_IV_SIZE]).err(),
            Some(CipherError::KeyIvLength)
        );
        assert_eq!(
            DesCbc::new(&[0u8; DES_KEY_SIZE], &[0u8; 16]).err(),
            Some(CipherError::KeyIvLength)
        );
    }

    #[test]
    fn boxed_dyn_cipher() {
        let mut cipher: Box<dyn BlockCipher> =
            Box::new(Aes256Cbc::new(&[3u8; AES_KEY_SIZE], &[4u8; AES_IV_SIZE]).unwrap());
        let mut out = Vec::new();
        cipher.encrypt(&[0u8; 32], &mut out).unwrap();
        assert_eq!(out.len(), 32);
    }
}
