//! Property-based tests for amount handling and deposit signing

use proptest::prelude::*;
use stakegen_credentials::{amount_split, is_valid_amount, Credential};
use stakegen_crypto::BlsSignature;
use stakegen_types::constants::{ETH2GWEI, FULL_DEPOSIT_AMOUNT};
use stakegen_types::{compute_deposit_domain, compute_signing_root, ALL_CHAINS};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Only the supported sizes split, and a split always sums to a full stake
    #[test]
    fn prop_amount_split(num_eth in 0u64..64) {
        match amount_split(num_eth) {
            Ok((deposit, stake)) => {
                prop_assert!(num_eth == 1 || num_eth == 12);
                prop_assert_eq!(deposit + stake, FULL_DEPOSIT_AMOUNT);
                prop_assert!(is_valid_amount(deposit));
                prop_assert!(is_valid_amount(stake));
            }
            Err(_) => prop_assert!(num_eth != 1 && num_eth != 12),
        }
    }

    /// Any in-bounds amount yields a record whose signature checks out on its chain
    #[test]
    fn prop_signed_deposit_verifies(
        seed in any::<[u8; 32]>(),
        index in 0u32..100,
        amount in ETH2GWEI..=32 * ETH2GWEI,
        chain in 0usize..ALL_CHAINS.len(),
    ) {
        let setting = ALL_CHAINS[chain];
        let credential = Credential::new(&seed, index, amount, setting).unwrap();
        let data = credential.signed_deposit();

        let root = compute_signing_root(
            &data.message(),
            compute_deposit_domain(setting.genesis_fork_version),
        );
        let signature = BlsSignature::from_bytes(data.signature.as_bytes()).unwrap();
        prop_assert!(credential.signing_pubkey().verify(root.as_slice(), &signature));
        prop_assert_eq!(data.amount, amount);
    }
}
