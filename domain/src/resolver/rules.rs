//! Per-method resolution rules

use super::context::{Resolution, ResolutionContext};
use crate::ballot::entities::Ballot;
use crate::ballot::tally::BallotTally;
use crate::consent::objection::Objection;
use crate::core::error::{DomainError, PreconditionViolation};
use crate::decision::method::DecisionMethod;
use crate::decision::result::DecisionResult;
use crate::nuanced::tally::rank_proposals;

/// Resolve a decision from its votes.
///
/// Zero votes means no quorum: WITHDRAWN, except for ADVISORY which is
/// always APPROVED. ADVICE_SOLICITATION is never computed and returns a
/// [`PreconditionViolation::ManualResolution`].
///
/// # Example
///
/// ```
/// use agora_domain::{Ballot, BallotValue, DecisionMethod, DecisionResult, ResolutionContext, resolve};
///
/// let ballots = vec![
///     Ballot::new("ana", BallotValue::Support),
///     Ballot::new("ben", BallotValue::Support),
///     Ballot::new("cho", BallotValue::Oppose),
/// ];
/// let resolution = resolve(DecisionMethod::Majority, &ballots, &ResolutionContext::new()).unwrap();
/// assert_eq!(resolution.result, DecisionResult::Approved);
///
/// let empty = resolve(DecisionMethod::Majority, &[], &ResolutionContext::new()).unwrap();
/// assert_eq!(empty.result, DecisionResult::Withdrawn);
/// ```
pub fn resolve(
    method: DecisionMethod,
    ballots: &[Ballot],
    context: &ResolutionContext,
) -> Result<Resolution, DomainError> {
    check_consistency(method, ballots, context)?;

    match method {
        DecisionMethod::AdviceSolicitation => {
            Err(PreconditionViolation::ManualResolution(method).into())
        }
        DecisionMethod::Advisory => Ok(Resolution::new(method, DecisionResult::Approved)
            .with_tally(BallotTally::from_ballots(ballots))),
        DecisionMethod::NuancedVote => {
            let ranking = rank_proposals(
                &context.proposals,
                &context.mentions,
                context.mention_scale,
            )?;
            let result = if context.mentions.is_empty() {
                DecisionResult::Withdrawn
            } else {
                DecisionResult::Approved
            };
            Ok(Resolution::new(method, result).with_ranking(ranking))
        }
        DecisionMethod::Consent if ballots.is_empty() && !context.objections.is_empty() => {
            Ok(Resolution::new(method, consent_objections(&context.objections)))
        }
        DecisionMethod::Consensus
        | DecisionMethod::Consent
        | DecisionMethod::Majority
        | DecisionMethod::Supermajority
        | DecisionMethod::WeightedVote => {
            let tally = BallotTally::from_ballots(ballots);
            let result = if tally.is_empty() {
                DecisionResult::Withdrawn
            } else {
                ballot_rule(method, &tally)
            };
            Ok(Resolution::new(method, result).with_tally(tally))
        }
    }
}

/// Resolve with a method name as stored by the host.
///
/// An unknown name is a [`ConfigurationError`](crate::ConfigurationError),
/// never a default outcome.
pub fn resolve_named(
    method: &str,
    ballots: &[Ballot],
    context: &ResolutionContext,
) -> Result<Resolution, DomainError> {
    resolve(method.parse::<DecisionMethod>()?, ballots, context)
}

fn inconsistent(method: DecisionMethod, reason: &str) -> DomainError {
    PreconditionViolation::InconsistentInput {
        method,
        reason: reason.to_string(),
    }
    .into()
}

/// Reject vote data that does not belong to the declared method
fn check_consistency(
    method: DecisionMethod,
    ballots: &[Ballot],
    context: &ResolutionContext,
) -> Result<(), DomainError> {
    if !context.mentions.is_empty() && method != DecisionMethod::NuancedVote {
        return Err(inconsistent(method, "mentions given where ballots are expected"));
    }
    if !context.objections.is_empty() && !method.accepts_objections() {
        return Err(inconsistent(method, "objections given to a non-consent method"));
    }
    if method == DecisionMethod::Consent && !ballots.is_empty() && !context.objections.is_empty() {
        return Err(inconsistent(method, "both ballots and objections given"));
    }
    if method == DecisionMethod::NuancedVote && !ballots.is_empty() {
        return Err(inconsistent(method, "ballots given where mentions are expected"));
    }
    if ballots.iter().any(|ballot| !ballot.has_valid_weight()) {
        return Err(inconsistent(method, "ballot weight is negative or not finite"));
    }
    Ok(())
}

/// Outcome of a non-empty ballot tally under a ballot-based method
fn ballot_rule(method: DecisionMethod, tally: &BallotTally) -> DecisionResult {
    let approved = match method {
        DecisionMethod::Consent => return consent_ballots(tally),
        // No partial consensus
        DecisionMethod::Consensus => tally.is_unanimous_strong_support(),
        // A tie is not approval
        DecisionMethod::Majority => tally.support > tally.opposition(),
        // support / total >= 2/3, in integers so the boundary is exact
        DecisionMethod::Supermajority => tally.support * 3 >= tally.total * 2,
        // Zero net weight is not approval
        DecisionMethod::WeightedVote => tally.weighted_sum > 0.0,
        DecisionMethod::Advisory => true,
        DecisionMethod::NuancedVote | DecisionMethod::AdviceSolicitation => false,
    };
    if approved {
        DecisionResult::Approved
    } else {
        DecisionResult::Rejected
    }
}

/// Block beats opposition, opposition beats everything else
fn consent_ballots(tally: &BallotTally) -> DecisionResult {
    if tally.block > 0 {
        DecisionResult::Blocked
    } else if tally.strong_oppose > 0 {
        DecisionResult::Rejected
    } else {
        DecisionResult::Approved
    }
}

fn consent_objections(objections: &[Objection]) -> DecisionResult {
    if objections.iter().any(|o| o.value.is_blocking()) {
        DecisionResult::Blocked
    } else {
        DecisionResult::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::value::BallotValue;
    use crate::consent::objection::ObjectionValue;
    use crate::core::error::ConfigurationError;
    use crate::decision::proposal::Proposal;
    use crate::nuanced::mention::{Mention, MentionScale, NuancedMention};

    use BallotValue::*;

    fn ballots(values: &[BallotValue]) -> Vec<Ballot> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Ballot::new(format!("voter-{}", i), v))
            .collect()
    }

    fn result_of(method: DecisionMethod, values: &[BallotValue]) -> DecisionResult {
        resolve(method, &ballots(values), &ResolutionContext::new())
            .unwrap()
            .result
    }

    #[test]
    fn test_consensus_requires_unanimous_strong_support() {
        assert_eq!(
            result_of(DecisionMethod::Consensus, &[StrongSupport, StrongSupport]),
            DecisionResult::Approved
        );
        for other in [Support, WeakSupport, Abstain, WeakOppose, Oppose, StrongOppose, Block] {
            assert_eq!(
                result_of(DecisionMethod::Consensus, &[StrongSupport, other, StrongSupport]),
                DecisionResult::Rejected,
                "{} should break consensus",
                other
            );
        }
    }

    #[test]
    fn test_consent_block_takes_precedence() {
        assert_eq!(
            result_of(DecisionMethod::Consent, &[StrongOppose, Block, Support]),
            DecisionResult::Blocked
        );
        assert_eq!(
            result_of(DecisionMethod::Consent, &[Block, Block]),
            DecisionResult::Blocked
        );
        assert_eq!(
            result_of(DecisionMethod::Consent, &[StrongSupport, StrongOppose]),
            DecisionResult::Rejected
        );
        assert_eq!(
            result_of(DecisionMethod::Consent, &[Oppose, WeakOppose, Abstain]),
            DecisionResult::Approved
        );
    }

    #[test]
    fn test_consent_with_objections() {
        let context = ResolutionContext::new().with_objections(vec![
            Objection::new("ana", ObjectionValue::NoObjection),
            Objection::new("ben", ObjectionValue::NoPosition),
        ]);
        let resolution = resolve(DecisionMethod::Consent, &[], &context).unwrap();
        assert_eq!(resolution.result, DecisionResult::Approved);

        let context = context.with_objections(vec![
            Objection::new("ana", ObjectionValue::NoObjection),
            Objection::new("cho", ObjectionValue::Objection),
        ]);
        let resolution = resolve(DecisionMethod::Consent, &[], &context).unwrap();
        assert_eq!(resolution.result, DecisionResult::Blocked);
    }

    #[test]
    fn test_majority() {
        assert_eq!(
            result_of(DecisionMethod::Majority, &[Support, Support, Oppose]),
            DecisionResult::Approved
        );
        assert_eq!(
            result_of(DecisionMethod::Majority, &[Support, Oppose]),
            DecisionResult::Rejected
        );
        // Abstentions count on neither side
        assert_eq!(
            result_of(DecisionMethod::Majority, &[WeakSupport, Abstain, Abstain]),
            DecisionResult::Approved
        );
        assert_eq!(
            result_of(DecisionMethod::Majority, &[Support, Block]),
            DecisionResult::Rejected
        );
    }

    #[test]
    fn test_supermajority_boundary_is_inclusive() {
        assert_eq!(
            result_of(DecisionMethod::Supermajority, &[Support, StrongSupport, Oppose]),
            DecisionResult::Approved
        );
        assert_eq!(
            result_of(DecisionMethod::Supermajority, &[Support, Oppose, Oppose]),
            DecisionResult::Rejected
        );
        // Abstentions still count as cast ballots
        assert_eq!(
            result_of(DecisionMethod::Supermajority, &[Support, Support, Abstain, Abstain]),
            DecisionResult::Rejected
        );
    }

    #[test]
    fn test_weighted_vote_zero_is_rejected() {
        assert_eq!(
            result_of(DecisionMethod::WeightedVote, &[Support, Oppose]),
            DecisionResult::Rejected
        );
        assert_eq!(
            result_of(DecisionMethod::WeightedVote, &[Support, WeakOppose]),
            DecisionResult::Approved
        );
        // Three strong supporters do not outweigh one block
        assert_eq!(
            result_of(
                DecisionMethod::WeightedVote,
                &[StrongSupport, StrongSupport, StrongSupport, Block]
            ),
            DecisionResult::Rejected
        );
    }

    #[test]
    fn test_weighted_vote_applies_ballot_weight() {
        let ballots = vec![
            Ballot::new("ana", Support).with_weight(1.0),
            Ballot::new("ben", Oppose).with_weight(0.5),
        ];
        let resolution =
            resolve(DecisionMethod::WeightedVote, &ballots, &ResolutionContext::new()).unwrap();
        assert_eq!(resolution.result, DecisionResult::Approved);
        assert_eq!(resolution.tally.unwrap().weighted_sum, 1.0);
    }

    #[test]
    fn test_advisory_is_always_approved() {
        assert_eq!(result_of(DecisionMethod::Advisory, &[]), DecisionResult::Approved);
        assert_eq!(
            result_of(DecisionMethod::Advisory, &[Block, StrongOppose]),
            DecisionResult::Approved
        );
    }

    #[test]
    fn test_empty_input_is_withdrawn() {
        for method in [
            DecisionMethod::Consensus,
            DecisionMethod::Consent,
            DecisionMethod::Majority,
            DecisionMethod::Supermajority,
            DecisionMethod::WeightedVote,
            DecisionMethod::NuancedVote,
        ] {
            assert_eq!(result_of(method, &[]), DecisionResult::Withdrawn, "{}", method);
        }
    }

    #[test]
    fn test_advice_solicitation_is_manual() {
        let err = resolve(
            DecisionMethod::AdviceSolicitation,
            &[],
            &ResolutionContext::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::Precondition(PreconditionViolation::ManualResolution(
                DecisionMethod::AdviceSolicitation
            ))
        );
    }

    #[test]
    fn test_nuanced_vote_ranks_proposals() {
        let context = ResolutionContext::new()
            .with_proposals(vec![Proposal::new("a", "A", 1), Proposal::new("b", "B", 2)])
            .with_mentions(
                MentionScale::Five,
                vec![
                    NuancedMention::new("a", "v1", Mention::Insufficient),
                    NuancedMention::new("b", "v1", Mention::Excellent),
                    NuancedMention::new("a", "v2", Mention::Passable),
                    NuancedMention::new("b", "v2", Mention::Good),
                ],
            );
        let resolution = resolve(DecisionMethod::NuancedVote, &[], &context).unwrap();

        assert_eq!(resolution.result, DecisionResult::Approved);
        assert_eq!(resolution.winner().unwrap().proposal.as_str(), "b");
        assert!(resolution.tally.is_none());
    }

    #[test]
    fn test_inconsistent_input_is_rejected() {
        let mentions = ResolutionContext::new().with_mentions(
            MentionScale::Three,
            vec![NuancedMention::new("a", "v1", Mention::Good)],
        );
        let err = resolve(DecisionMethod::Majority, &[], &mentions).unwrap_err();
        assert!(err.is_precondition());

        let objections = ResolutionContext::new()
            .with_objections(vec![Objection::new("ana", ObjectionValue::Objection)]);
        assert!(resolve(DecisionMethod::Consensus, &[], &objections).is_err());
        assert!(resolve(DecisionMethod::Consent, &ballots(&[Support]), &objections).is_err());
        assert!(
            resolve(DecisionMethod::NuancedVote, &ballots(&[Support]), &ResolutionContext::new())
                .is_err()
        );
    }

    #[test]
    fn test_negative_weight_is_inconsistent() {
        let mut oppose = Ballot::new("ana", Oppose);
        oppose.weight = -5.0;
        let err = resolve(DecisionMethod::WeightedVote, &[oppose], &ResolutionContext::new())
            .unwrap_err();
        assert!(err.is_precondition());

        let mut nan = Ballot::new("ben", Support);
        nan.weight = f64::NAN;
        assert!(resolve(DecisionMethod::Majority, &[nan], &ResolutionContext::new()).is_err());
    }

    #[test]
    fn test_unknown_method_name_is_configuration_error() {
        let err = resolve_named("RANKED_CHOICE", &[], &ResolutionContext::new()).unwrap_err();
        assert_eq!(
            err,
            DomainError::Configuration(ConfigurationError::UnknownMethod(
                "RANKED_CHOICE".to_string()
            ))
        );
        assert_eq!(
            resolve_named("majority", &ballots(&[Support]), &ResolutionContext::new())
                .unwrap()
                .result,
            DecisionResult::Approved
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = ballots(&[Support, WeakOppose, Block, StrongSupport, Abstain]);
        for method in [
            DecisionMethod::Consensus,
            DecisionMethod::Consent,
            DecisionMethod::Majority,
            DecisionMethod::Supermajority,
            DecisionMethod::WeightedVote,
        ] {
            let first = resolve(method, &input, &ResolutionContext::new()).unwrap();
            let second = resolve(method, &input, &ResolutionContext::new()).unwrap();
            assert_eq!(first, second);
        }
    }
}
