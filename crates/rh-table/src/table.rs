//! The table service.
//!
//! `Table` bundles the attribute store, the moderator role map, pending
//! offers and the random source. Every operation runs to completion on
//! `&mut self`; a multi-threaded host wraps the table in a `Mutex`.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rh_coc::{Character, CheckResult, GrowthResult, SanityResult};
use rh_dice::{DiceRoll, Expression, FlipResult, preview};
use serde::Serialize;

use crate::attributes::{AttributeChange, AttributeSet, AttributeStore, Removal, format_columns};
use crate::config::TableConfig;
use crate::error::{TableError, TableResult};
use crate::offer::{CheckDisposition, OfferKind, OfferResolution, PendingCheck};
use crate::request::{
    AttributeRemoveRequest, AttributeSetRequest, CheckRequest, EvaluateRequest, EvaluateResult,
    GenerateCharacterRequest, GeneratedCharacter,
};
use crate::roles::{ClaimOutcome, RoleState};

/// Label of the sanity attribute.
pub const SANITY_LABEL: &str = "SAN";

/// A percentile check against a stored attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeCheck {
    /// Stored label of the attribute.
    pub label: String,
    /// The rolled check (target is the attribute value).
    pub result: CheckResult,
}

impl fmt::Display for AttributeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.result)
    }
}

/// A growth check and the value written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthReport {
    /// Stored label of the attribute.
    pub label: String,
    /// Value before the check.
    pub old: i64,
    /// Value after the check (unchanged on success).
    pub new: i64,
    /// The rolled growth check.
    pub result: GrowthResult,
}

impl fmt::Display for GrowthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.result.gain {
            Some(gain) => write!(
                f,
                "{} growth {}: +{gain} ({} -> {})",
                self.label, self.result.check, self.old, self.new
            ),
            None => write!(
                f,
                "{} growth {}: no change",
                self.label, self.result.check
            ),
        }
    }
}

/// A sanity check and the SAN written back.
#[derive(Debug, Clone, Serialize)]
pub struct SanityReport {
    /// Stored label of the sanity attribute.
    pub label: String,
    /// The rolled sanity check.
    pub result: SanityResult,
}

impl fmt::Display for SanityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;
        write!(f, "{} {}: lost {}", self.label, r.check, r.loss)?;
        if !r.loss_roll.trace.is_empty() {
            write!(f, " ({})", r.loss_roll.trace)?;
        }
        write!(f, ", {} -> {}", r.new_sanity + r.loss, r.new_sanity)?;
        if let Some(bout) = &r.bout {
            write!(f, "\nBout of madness: {bout}")?;
        }
        Ok(())
    }
}

/// Session state shared by every command.
pub struct Table {
    config: TableConfig,
    store: AttributeStore,
    roles: RoleState,
    offers: Vec<PendingCheck>,
    next_offer: u64,
    rng: StdRng,
}

impl Table {
    /// Create a table from configuration.
    pub fn new(config: TableConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            store: AttributeStore::new(),
            roles: RoleState::new(),
            offers: Vec::new(),
            next_offer: 1,
            rng,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Get the attribute store.
    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    /// Get the role map.
    pub fn roles(&self) -> &RoleState {
        &self.roles
    }

    // -----------------------------------------------------------------------
    // Dice and pickers
    // -----------------------------------------------------------------------

    /// Evaluate a dice expression.
    pub fn evaluate(&mut self, req: &EvaluateRequest) -> TableResult<EvaluateResult> {
        let evaluation = rh_dice::evaluate(&req.expr, &mut self.rng)?;
        Ok(EvaluateResult::new(&req.expr, &evaluation))
    }

    /// Roll `count` dice with `sides` sides.
    pub fn quick_roll(&mut self, count: i64, sides: i64) -> TableResult<DiceRoll> {
        Ok(rh_dice::quick_roll(count, sides, &mut self.rng)?)
    }

    /// Render values as a list, truncated at the configured preview limit.
    pub fn preview<T: fmt::Display>(&self, values: &[T], noun: &str) -> String {
        preview(values, self.config.preview_limit, noun)
    }

    /// Pick `num` distinct items.
    pub fn choose(&mut self, items: &[String], num: i64) -> TableResult<Vec<String>> {
        Ok(rh_dice::choose(items, num, &mut self.rng)?)
    }

    /// Shuffle items.
    pub fn shuffle(&mut self, items: &[String]) -> TableResult<Vec<String>> {
        Ok(rh_dice::shuffle(items, &mut self.rng)?)
    }

    /// Flip `coins` coins.
    pub fn flip(&mut self, coins: i64) -> TableResult<FlipResult> {
        Ok(rh_dice::flip(coins, &mut self.rng)?)
    }

    // -----------------------------------------------------------------------
    // Checks
    // -----------------------------------------------------------------------

    /// Roll a percentile check against a bare target.
    pub fn check(&mut self, req: CheckRequest) -> TableResult<CheckResult> {
        let target = check_target(req.target)?;
        Ok(rh_coc::check(target, &mut self.rng))
    }

    /// Roll a percentile check against one of the subject's attributes.
    pub fn check_attribute(
        &mut self,
        scope: u64,
        subject: u64,
        label: &str,
    ) -> TableResult<AttributeCheck> {
        let (label, value) = self.int_attribute(scope, subject, label)?;
        let target = check_target(value)?;
        let result = rh_coc::check(target, &mut self.rng);
        tracing::debug!(scope, subject, %label, roll = result.roll, "attribute check");
        Ok(AttributeCheck { label, result })
    }

    /// Roll a growth check and add any gain to the attribute.
    pub fn growth(&mut self, scope: u64, subject: u64, label: &str) -> TableResult<GrowthReport> {
        let (label, old) = self.int_attribute(scope, subject, label)?;
        let target = check_target(old)?;
        let result = rh_coc::growth(target, &mut self.rng);
        let new = old + result.gain.map_or(0, i64::from);
        if new != old {
            self.store.set_many(scope, subject, [(label.as_str(), new)])?;
        }
        Ok(GrowthReport {
            label,
            old,
            new,
            result,
        })
    }

    /// Roll a sanity check against the subject's SAN and write the result.
    pub fn sanity(
        &mut self,
        scope: u64,
        subject: u64,
        on_success: &str,
        on_failure: &str,
    ) -> TableResult<SanityReport> {
        let on_success = Expression::parse(on_success)?;
        let on_failure = Expression::parse(on_failure)?;
        self.roll_sanity(scope, subject, &on_success, &on_failure)
    }

    fn roll_sanity(
        &mut self,
        scope: u64,
        subject: u64,
        on_success: &Expression,
        on_failure: &Expression,
    ) -> TableResult<SanityReport> {
        let (label, current) = self.int_attribute(scope, subject, SANITY_LABEL)?;
        let result = rh_coc::sanity_check(current, on_success, on_failure, &mut self.rng)?;
        self.store
            .set_many(scope, subject, [(label.as_str(), result.new_sanity)])?;
        Ok(SanityReport { label, result })
    }

    fn int_attribute(&self, scope: u64, subject: u64, label: &str) -> TableResult<(String, i64)> {
        let Some(attr) = self.store.get(scope, subject, label) else {
            return Err(TableError::AttributeNotFound {
                label: label.trim().to_string(),
            });
        };
        let value = attr
            .value
            .as_int()
            .ok_or_else(|| TableError::InvalidAttributeValue {
                label: attr.label.clone(),
                reason: format!("'{}' is not an integer", attr.value),
            })?;
        Ok((attr.label.clone(), value))
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    /// All attributes of a subject.
    pub fn attributes(&self, scope: u64, subject: u64) -> &AttributeSet {
        self.store.get_all(scope, subject)
    }

    /// Set attributes.
    pub fn set_attributes(&mut self, req: &AttributeSetRequest) -> TableResult<Vec<(String, i64)>> {
        self.store.set_many(
            req.scope_id,
            req.subject_id,
            req.pairs.iter().map(|(label, value)| (label.as_str(), *value)),
        )
    }

    /// Add deltas to attributes.
    pub fn add_attributes(
        &mut self,
        scope: u64,
        subject: u64,
        pairs: &[(String, i64)],
    ) -> TableResult<Vec<AttributeChange>> {
        self.store.add_many(
            scope,
            subject,
            pairs.iter().map(|(label, delta)| (label.as_str(), *delta)),
        )
    }

    /// Remove attributes.
    pub fn remove_attributes(&mut self, req: &AttributeRemoveRequest) -> Removal {
        self.store
            .remove(req.scope_id, req.subject_id, &req.labels)
    }

    /// Delete all of a subject's attributes and release their moderator role.
    pub fn reset(&mut self, scope: u64, subject: u64) -> bool {
        let existed = self.store.reset(scope, subject);
        self.release_moderator(scope, subject);
        existed
    }

    /// Set or clear (`clear`) the display name.
    pub fn set_name(&mut self, scope: u64, subject: u64, name: &str) -> TableResult<Option<String>> {
        self.store.set_display_name(scope, subject, name)
    }

    /// The display-name override, if set.
    pub fn display_name(&self, scope: u64, subject: u64) -> Option<&str> {
        self.store.display_name(scope, subject)
    }

    /// Render a subject's attributes in the configured number of columns.
    pub fn sheet(&self, scope: u64, subject: u64) -> String {
        format_columns(self.store.get_all(scope, subject), self.config.columns)
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    /// Generate a character and store its characteristics and derived stats.
    pub fn generate_character(
        &mut self,
        req: GenerateCharacterRequest,
    ) -> TableResult<GeneratedCharacter> {
        let character = rh_coc::generate(&mut self.rng)?;
        let pairs = character
            .values()
            .iter()
            .copied()
            .chain(character.derived().pairs());
        let attributes = self.store.set_many(req.scope_id, req.subject_id, pairs)?;
        Ok(GeneratedCharacter {
            attributes,
            block: character.render_block(),
        })
    }

    /// Roll several candidate characters without storing any.
    pub fn generate_candidates(&mut self, count: usize) -> TableResult<Vec<Character>> {
        Ok(rh_coc::generate_many(count, &mut self.rng)?)
    }

    // -----------------------------------------------------------------------
    // Moderator role and offers
    // -----------------------------------------------------------------------

    /// Claim the moderator role.
    pub fn claim_moderator(&mut self, scope: u64, subject: u64) -> TableResult<ClaimOutcome> {
        self.roles.claim(scope, subject)
    }

    /// Release the moderator role if held, closing the offers made under it.
    pub fn release_moderator(&mut self, scope: u64, subject: u64) -> bool {
        if !self.roles.release_if_holder(scope, subject) {
            return false;
        }
        let before = self.offers.len();
        self.offers
            .retain(|o| !(o.scope_id == scope && o.offered_by == subject));
        let closed = before - self.offers.len();
        if closed > 0 {
            tracing::info!(scope, subject, closed, "offers closed with moderator role");
        }
        true
    }

    /// The moderator of a scope.
    pub fn moderator(&self, scope: u64) -> Option<u64> {
        self.roles.holder_of(scope)
    }

    /// Request a skill check: the moderator offers it, anyone else rolls it.
    pub fn request_check(
        &mut self,
        scope: u64,
        requester: u64,
        label: &str,
    ) -> TableResult<CheckDisposition<AttributeCheck>> {
        if self.roles.is_holder(scope, requester) {
            let label = label.trim();
            if label.is_empty() {
                return Err(TableError::AttributeNotFound {
                    label: String::new(),
                });
            }
            let id = self.offer(
                scope,
                requester,
                OfferKind::Skill {
                    label: label.to_string(),
                },
            );
            return Ok(CheckDisposition::Offered(id));
        }
        Ok(CheckDisposition::Resolved(
            self.check_attribute(scope, requester, label)?,
        ))
    }

    /// Request a sanity check: the moderator offers it, anyone else rolls it.
    ///
    /// Both expressions are parsed before an offer is created.
    pub fn request_sanity(
        &mut self,
        scope: u64,
        requester: u64,
        on_success: &str,
        on_failure: &str,
    ) -> TableResult<CheckDisposition<SanityReport>> {
        let on_success = Expression::parse(on_success)?;
        let on_failure = Expression::parse(on_failure)?;
        if self.roles.is_holder(scope, requester) {
            on_success.validate()?;
            on_failure.validate()?;
            let id = self.offer(
                scope,
                requester,
                OfferKind::Sanity {
                    on_success,
                    on_failure,
                },
            );
            return Ok(CheckDisposition::Offered(id));
        }
        Ok(CheckDisposition::Resolved(self.roll_sanity(
            scope,
            requester,
            &on_success,
            &on_failure,
        )?))
    }

    fn offer(&mut self, scope: u64, offered_by: u64, kind: OfferKind) -> u64 {
        let id = self.next_offer;
        self.next_offer += 1;
        let offer = PendingCheck {
            id,
            scope_id: scope,
            offered_by,
            kind,
        };
        tracing::info!(scope, offered_by, %offer, "check offered");
        self.offers.push(offer);
        id
    }

    /// Roll a pending offer against the accepting subject's attributes.
    ///
    /// The offer stays open for other subjects until cancelled.
    pub fn accept(&mut self, scope: u64, subject: u64, id: u64) -> TableResult<OfferResolution> {
        let offer = self
            .offers
            .iter()
            .find(|o| o.id == id && o.scope_id == scope)
            .ok_or(TableError::UnknownOffer(id))?;
        if offer.offered_by == subject {
            return Err(TableError::SelfAccept);
        }
        match offer.kind.clone() {
            OfferKind::Skill { label } => Ok(OfferResolution::Skill(
                self.check_attribute(scope, subject, &label)?,
            )),
            OfferKind::Sanity {
                on_success,
                on_failure,
            } => Ok(OfferResolution::Sanity(self.roll_sanity(
                scope,
                subject,
                &on_success,
                &on_failure,
            )?)),
        }
    }

    /// Close an offer. Only its author or the current moderator may cancel.
    pub fn cancel(&mut self, scope: u64, moderator: u64, id: u64) -> TableResult<PendingCheck> {
        let index = self
            .offers
            .iter()
            .position(|o| o.id == id && o.scope_id == scope)
            .ok_or(TableError::UnknownOffer(id))?;
        let offer = &self.offers[index];
        if offer.offered_by != moderator && !self.roles.is_holder(scope, moderator) {
            return Err(TableError::NotModerator);
        }
        let offer = self.offers.remove(index);
        tracing::info!(scope, id, "offer cancelled");
        Ok(offer)
    }

    /// Open offers in a scope, oldest first.
    pub fn pending(&self, scope: u64) -> impl Iterator<Item = &PendingCheck> {
        self.offers.iter().filter(move |o| o.scope_id == scope)
    }
}

fn check_target(value: i64) -> TableResult<u32> {
    match u32::try_from(value) {
        Ok(target @ 1..=100) => Ok(target),
        _ => Err(TableError::TargetOutOfRange(value)),
    }
}
