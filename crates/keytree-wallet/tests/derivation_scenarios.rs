//! End-to-end derivation walks checked against published fixtures.

use keytree_wallet::address::{self, COIN_TYPE_BITCOIN, COIN_TYPE_ETHEREUM};
use keytree_wallet::bip39;
use keytree_wallet::{
    derive, derive_with_config, ChildNumber, DerivationConfig, DerivationPath,
    ExtendedPrivateKey, ExtendedPublicKey, WalletError,
};

const ZERO_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                             abandon abandon abandon abandon abandon about";

const TEST_JUNK_MNEMONIC: &str = "test test test test test test test test test test test junk";

#[test]
fn bitcoin_first_address_of_zero_entropy() {
    let derivation = derive(Some(&[0u8; 16]), COIN_TYPE_BITCOIN).unwrap();

    assert_eq!(derivation.entropy, vec![0u8; 16]);
    assert_eq!(derivation.mnemonic, ZERO_MNEMONIC);
    assert_eq!(
        hex::encode(derivation.seed),
        "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389\
         cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
    );
    assert_eq!(derivation.path.to_string(), "m/44'/0'/0'/0/0");
    assert_eq!(derivation.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
}

#[test]
fn trezor_vector_seed_and_root_key() {
    let seed = bip39::mnemonic_to_seed(ZERO_MNEMONIC, "TREZOR");
    assert_eq!(
        hex::encode(seed),
        "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a698759\
         9d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
    );

    let master = ExtendedPrivateKey::new_master(&seed).unwrap();
    assert_eq!(
        master.to_base58(),
        "xprv9s21ZrQH143K3h3fDYiay8mocZ3afhfULfb5GX8kCBdno77K4HiA15Tg23wpbeF1pLfs1c5\
         SPmYHrEpTuuRhxMwvKDwqdKiGJS9XFKzUsAF"
    );
}

#[test]
fn mnemonic_decodes_to_expected_entropy() {
    let mnemonic =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";
    assert_eq!(bip39::mnemonic_to_entropy(mnemonic).unwrap(), vec![0x7f; 16]);

    let seed = bip39::mnemonic_to_seed(mnemonic, "TREZOR");
    assert_eq!(
        hex::encode(seed),
        "2e8905819b8723fe2c1d161860e5ee1830318dbf49a83bd451cfb8440c28bd6fa457fe12961\
         06559a3c80937a1c1069be3a3a5bd381ee6260e8d9739fce1f607"
    );
}

#[test]
fn ethereum_first_address_of_test_mnemonic() {
    let entropy = bip39::mnemonic_to_entropy(TEST_JUNK_MNEMONIC).unwrap();
    let config = DerivationConfig {
        coin_type: COIN_TYPE_ETHEREUM,
        ..DerivationConfig::default()
    };
    let derivation = derive_with_config(Some(&entropy), &config).unwrap();

    assert_eq!(derivation.mnemonic, TEST_JUNK_MNEMONIC);
    assert_eq!(derivation.path.to_string(), "m/44'/60'/0'/0/0");
    assert_eq!(
        derivation.address,
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
    );
    assert_eq!(
        address::to_eip55(&derivation.address).unwrap(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
}

#[test]
fn ethereum_second_address_of_test_mnemonic() {
    let entropy = bip39::mnemonic_to_entropy(TEST_JUNK_MNEMONIC).unwrap();
    let config = DerivationConfig {
        coin_type: COIN_TYPE_ETHEREUM,
        address_index: 1,
        ..DerivationConfig::default()
    };
    let derivation = derive_with_config(Some(&entropy), &config).unwrap();

    assert_eq!(derivation.path.to_string(), "m/44'/60'/0'/0/1");
    assert_eq!(
        address::to_eip55(&derivation.address).unwrap(),
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
    );
}

#[test]
fn tampered_sentence_fails_checksum() {
    let tampered = "abandon abandon abandon abandon abandon abandon \
                    abandon abandon abandon abandon abandon above";
    assert!(!bip39::validate_mnemonic(tampered));
    assert!(matches!(
        bip39::mnemonic_to_entropy(tampered),
        Err(WalletError::BadChecksum)
    ));
}

#[test]
fn hardened_step_requires_private_key() {
    let derivation = derive(Some(&[0u8; 16]), COIN_TYPE_BITCOIN).unwrap();
    let neutered = derivation.master_key.neuter();

    assert!(matches!(
        neutered.derive_child(ChildNumber::Hardened(44)),
        Err(WalletError::HardenedFromPublic)
    ));
}

#[test]
fn leading_zero_bytes_survive_base58() {
    assert_eq!(
        keytree_primitives::base58::encode(&[0u8; 21]),
        "111111111111111111111"
    );
}

#[test]
fn watch_only_account_matches_private_walk() {
    let derivation = derive(Some(&[0x37; 16]), COIN_TYPE_BITCOIN).unwrap();

    // Hand the hardened account xpub to a watch-only wallet and let it
    // derive the external chain on its own.
    let account_path: DerivationPath = "m/44'/0'/0'".parse().unwrap();
    let account_key = derivation.master_key.derive_path(&account_path).unwrap();
    let watch_only =
        ExtendedPublicKey::from_base58(&account_key.neuter().to_base58()).unwrap();

    let external: DerivationPath = "m/0/0".parse().unwrap();
    let leaf = watch_only.derive_path(&external).unwrap();
    assert_eq!(address::p2pkh_address(&leaf.public_key), derivation.address);
}

#[test]
fn address_indexes_yield_distinct_addresses() {
    let mut seen = std::collections::HashSet::new();
    for index in 0..5 {
        let config = DerivationConfig {
            address_index: index,
            ..DerivationConfig::default()
        };
        let derivation = derive_with_config(Some(&[0x42; 16]), &config).unwrap();
        assert!(seen.insert(derivation.address.clone()));
    }
}
