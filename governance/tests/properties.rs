//! Property tests: random operation sequences against one engine, checking
//! tally, execution and treasury invariants after every step.

use std::sync::Arc;

use proptest::prelude::*;

use coffer_governance::{
    ExecutionOutcome, GovernanceConfig, GovernanceEngine, GovernanceError, ProposalSnapshot,
    VoteChoice,
};
use coffer_nullables::{NullClock, NullMarket, NullRegistry};
use coffer_types::{Amount, AssetId, CredentialId, Identity, ProposalId};

const WINDOW: u64 = 100;
const PRICE: u128 = 40;
const MEMBERS: u8 = 4;

#[derive(Clone, Debug)]
enum Op {
    Create { member: u8, asset: u64 },
    Vote { member: u8, proposal: u64, yay: bool },
    Execute { member: u8, proposal: u64 },
    Advance(u64),
    Deposit(u128),
    Mint { member: u8 },
    Transfer { credential: u64, to: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..MEMBERS, 0u64..6).prop_map(|(member, asset)| Op::Create { member, asset }),
        (0..MEMBERS, 0u64..6, any::<bool>())
            .prop_map(|(member, proposal, yay)| Op::Vote { member, proposal, yay }),
        (0..MEMBERS, 0u64..6).prop_map(|(member, proposal)| Op::Execute { member, proposal }),
        (0u64..80).prop_map(Op::Advance),
        (0u128..60).prop_map(Op::Deposit),
        (0..MEMBERS).prop_map(|member| Op::Mint { member }),
        (0u64..12, 0..MEMBERS).prop_map(|(credential, to)| Op::Transfer { credential, to }),
    ]
}

fn member(n: u8) -> Identity {
    Identity::from_seed(n + 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_over_random_operations(ops in prop::collection::vec(op(), 1..80)) {
        let registry = Arc::new(NullRegistry::new());
        let market = Arc::new(NullMarket::new(Amount::new(PRICE)));
        let clock = Arc::new(NullClock::new(0));
        let engine = GovernanceEngine::new(
            GovernanceConfig::with_voting_window(WINDOW),
            Identity::from_seed(0xff),
            Arc::clone(&registry),
            Arc::clone(&market),
            Arc::clone(&clock),
        )
        .unwrap();
        // Member 3 starts without credentials.
        for n in 0..MEMBERS - 1 {
            registry.mint_many(&member(n), u64::from(n) + 1);
        }

        let mut created = 0u64;
        let mut deposited = 0u128;
        let mut spent = 0u128;
        let mut applied: Vec<u64> = Vec::new();
        let mut before: Vec<ProposalSnapshot> = Vec::new();

        for op in ops {
            let now = clock_now(&clock);
            match op {
                Op::Create { member: m, asset } => {
                    if engine.create_proposal(&member(m), AssetId(asset)).is_ok() {
                        created += 1;
                        applied.push(0);
                    }
                }
                Op::Vote { member: m, proposal, yay } => {
                    let id = ProposalId(proposal);
                    let open = engine.proposal(id).is_some_and(|p| now < p.deadline.as_secs());
                    let choice = if yay { VoteChoice::Yay } else { VoteChoice::Nay };
                    match engine.vote(id, &member(m), choice) {
                        Ok(weight) => {
                            prop_assert!(open, "vote accepted on a closed proposal");
                            prop_assert!(weight > 0);
                            applied[proposal as usize] += weight;
                        }
                        Err(GovernanceError::DeadlineExceeded(_)) => {
                            prop_assert!(!open, "open proposal reported as expired");
                        }
                        Err(_) => {}
                    }
                }
                Op::Execute { member: m, proposal } => {
                    if let Ok(ExecutionOutcome::Purchased { price, .. }) =
                        engine.execute(ProposalId(proposal), &member(m))
                    {
                        spent += price.raw();
                    }
                }
                Op::Advance(secs) => clock.advance(secs),
                Op::Deposit(raw) => {
                    engine.deposit(Amount::new(raw)).unwrap();
                    deposited += raw;
                }
                Op::Mint { member: m } => {
                    registry.mint(&member(m));
                }
                Op::Transfer { credential, to } => {
                    registry.transfer(CredentialId(credential), &member(to));
                }
            }

            let after = engine.proposals();
            prop_assert_eq!(engine.proposal_count(), created);
            prop_assert_eq!(after.len() as u64, created);
            for (i, p) in after.iter().enumerate() {
                prop_assert_eq!(p.id, ProposalId(i as u64));
                // Every voted credential contributed exactly one unit.
                prop_assert_eq!(p.yay + p.nay, p.voters as u64);
                prop_assert_eq!(p.yay + p.nay, applied[i]);
                if let Some(old) = before.get(i) {
                    prop_assert!(p.yay >= old.yay && p.nay >= old.nay);
                    prop_assert!(!(old.executed && !p.executed), "executed flag reverted");
                    prop_assert_eq!(p.deadline, old.deadline);
                }
            }
            prop_assert_eq!(engine.treasury_balance(), Amount::new(deposited - spent));
            prop_assert_eq!(engine.available_funds(), engine.treasury_balance());
            before = after;
        }

        let bought = market.purchases();
        prop_assert_eq!(
            bought.iter().map(|(_, a)| a.raw()).sum::<u128>(),
            spent
        );
    }
}

fn clock_now(clock: &NullClock) -> u64 {
    use coffer_governance::Clock;
    clock.now().as_secs()
}
