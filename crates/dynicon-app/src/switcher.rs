//! Icon switch state machine
//!
//! Converges the component set so that exactly one of the main entry point or
//! a single alias is enabled. The target is always enabled before anything
//! else is disabled: two visible icons for a moment is better than none.
//!
//! Every entry point takes the same lock, so an immediate request and a
//! deferred task can never interleave their enable/disable sequences.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::blacklist::is_blacklisted;
use crate::components::{ComponentRegistry, MutationOutcome};
use crate::context::HostContext;
use crate::deferred::{DeferredTask, DeferredTrigger};
use crate::pending::PendingSelection;
use crate::resolver::{
    aliases, currently_enabled_alias, find_alias, main_entry_point, resolve_full_identifier,
};
use dynicon_core::prelude::*;
use dynicon_core::{BlacklistFilter, ComponentId, IconComponent};

/// How a switch request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SwitchOutcome {
    /// Target enabled, everything else disabled
    Applied,
    /// Target was already the enabled alias; nothing mutated
    AlreadyActive,
    /// Device is blacklisted; request stored for the deferred trigger
    Deferred,
    /// Requested name is not a declared alias; nothing mutated
    UnknownIcon,
    /// Main entry point restored
    Reset,
    /// Deferred task found no pending selection
    NothingPending,
    /// Deferred reset dropped because a newer request replaced it
    Superseded,
}

/// Outcome of one switch plus every registry mutation it issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchReport {
    pub outcome: SwitchOutcome,
    /// Fully-qualified component the request converges on
    pub target: Option<ComponentId>,
    pub mutations: Vec<MutationOutcome>,
}

impl SwitchReport {
    fn new(outcome: SwitchOutcome, target: Option<ComponentId>) -> Self {
        Self {
            outcome,
            target,
            mutations: Vec::new(),
        }
    }

    /// Components whose enable/disable call failed
    pub fn failed_components(&self) -> Vec<&ComponentId> {
        self.mutations
            .iter()
            .filter(|m| !m.succeeded())
            .map(|m| &m.id)
            .collect()
    }

    /// Whether any registry call was made
    pub fn mutated(&self) -> bool {
        !self.mutations.is_empty()
    }
}

/// State shared by every entry point, held under the switch lock
#[derive(Debug, Default)]
struct SwitchState {
    /// A deferred reset is queued and no later request has replaced it
    reset_requested: bool,
}

/// Serialized icon switcher
pub struct IconSwitcher {
    trigger: Arc<dyn DeferredTrigger>,
    state: Mutex<SwitchState>,
}

impl IconSwitcher {
    pub fn new(trigger: Arc<dyn DeferredTrigger>) -> Self {
        Self {
            trigger,
            state: Mutex::new(SwitchState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SwitchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch to `requested`, or defer the switch on blacklisted devices
    ///
    /// The name is persisted first; only a failed persist is returned as an
    /// error. Registry failures are collected in the report.
    #[instrument(skip(self, ctx, filter), fields(package = ctx.package_namespace()))]
    pub fn apply_switch(
        &self,
        ctx: &HostContext<'_>,
        requested: &str,
        filter: &BlacklistFilter,
    ) -> Result<SwitchReport> {
        let mut state = self.lock();
        let pending = PendingSelection::new(ctx.preferences);
        pending.set(requested)?;
        state.reset_requested = false;

        let registry = ComponentRegistry::new(ctx.store);
        let target = resolve_full_identifier(requested, ctx.package_namespace());
        debug!("Full target name: {}", target);

        let components = registry.list_all_components();
        let scan = currently_enabled_alias(&registry, &components);
        debug!("Currently enabled alias: {:?}", scan.current_id());

        if scan.current_id() == Some(&target) && !scan.is_ambiguous() {
            info!("Target icon already enabled, skipping");
            pending.clear();
            return Ok(SwitchReport::new(SwitchOutcome::AlreadyActive, Some(target)));
        }

        if is_blacklisted(filter, ctx.device) {
            info!("Device in blacklist ({}), deferring switch to {}", ctx.device, target);
            self.trigger.schedule(DeferredTask::ApplyPending);
            return Ok(SwitchReport::new(SwitchOutcome::Deferred, Some(target)));
        }

        let report = converge(&registry, &components, target);
        pending.clear();
        Ok(report)
    }

    /// Restore the main entry point, or defer the reset on blacklisted devices
    ///
    /// Clears the pending selection first; a removal that is not committed is
    /// returned as [`Error::PersistFailure`].
    pub fn request_reset(
        &self,
        ctx: &HostContext<'_>,
        filter: &BlacklistFilter,
    ) -> Result<SwitchReport> {
        let mut state = self.lock();
        PendingSelection::new(ctx.preferences).remove()?;

        if is_blacklisted(filter, ctx.device) {
            info!("Device in blacklist ({}), deferring reset", ctx.device);
            state.reset_requested = true;
            self.trigger.schedule(DeferredTask::ResetToDefault);
            let registry = ComponentRegistry::new(ctx.store);
            let main = main_entry_point(&registry.list_all_components()).map(|c| c.id.clone());
            return Ok(SwitchReport::new(SwitchOutcome::Deferred, main));
        }

        state.reset_requested = false;
        Ok(reset(ctx))
    }

    /// Enable the main entry point, disable every alias and clear the pending
    /// selection. Never fails; individual registry errors are in the report.
    pub fn reset_to_default(&self, ctx: &HostContext<'_>) -> SwitchReport {
        let mut state = self.lock();
        state.reset_requested = false;
        reset(ctx)
    }

    /// Apply whatever the pending selection holds, ignoring the blacklist
    pub fn apply_pending(&self, ctx: &HostContext<'_>) -> SwitchReport {
        let _state = self.lock();
        let pending = PendingSelection::new(ctx.preferences);

        let Some(requested) = pending.get() else {
            debug!("No target icon specified");
            return SwitchReport::new(SwitchOutcome::NothingPending, None);
        };
        info!("Applying pending icon: {}", requested);

        let registry = ComponentRegistry::new(ctx.store);
        let target = resolve_full_identifier(&requested, ctx.package_namespace());
        let components = registry.list_all_components();
        let scan = currently_enabled_alias(&registry, &components);

        let report = if scan.current_id() == Some(&target) && !scan.is_ambiguous() {
            info!("Target icon already enabled, skipping");
            SwitchReport::new(SwitchOutcome::AlreadyActive, Some(target))
        } else {
            converge(&registry, &components, target)
        };

        pending.clear();
        report
    }

    /// Run a task previously handed to the deferred trigger
    ///
    /// A queued reset only runs while no later request has replaced it.
    pub fn run_deferred(&self, ctx: &HostContext<'_>, task: DeferredTask) -> SwitchReport {
        match task {
            DeferredTask::ApplyPending => self.apply_pending(ctx),
            DeferredTask::ResetToDefault => {
                let mut state = self.lock();
                if !state.reset_requested {
                    info!("Deferred reset superseded by a newer request, skipping");
                    return SwitchReport::new(SwitchOutcome::Superseded, None);
                }
                state.reset_requested = false;
                reset(ctx)
            }
        }
    }

    /// Identifier of the enabled alias, `None` when the main entry point shows
    pub fn current_alias(&self, ctx: &HostContext<'_>) -> Option<ComponentId> {
        let registry = ComponentRegistry::new(ctx.store);
        let components = registry.list_all_components();
        currently_enabled_alias(&registry, &components).current.map(|c| c.id)
    }

    /// True when at least one alias is declared beyond the main entry point
    pub fn supports_alternate_icons(&self, ctx: &HostContext<'_>) -> bool {
        let count = ComponentRegistry::new(ctx.store).list_all_components().len();
        debug!("supportsAlternateIcons: {} declared components", count);
        count > 1
    }
}

impl std::fmt::Debug for IconSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconSwitcher").finish_non_exhaustive()
    }
}

/// Steps 5-8: enable the target alias, then disable every other component
fn converge(
    registry: &ComponentRegistry<'_>,
    components: &[IconComponent],
    target: ComponentId,
) -> SwitchReport {
    let Some(alias) = find_alias(&target, components) else {
        error!("Target alias not found: {}", target);
        error!(
            "Available aliases: {:?}",
            aliases(components).map(|a| a.id.as_str()).collect::<Vec<_>>()
        );
        return SwitchReport::new(SwitchOutcome::UnknownIcon, Some(target));
    };

    let mut report = SwitchReport::new(SwitchOutcome::Applied, Some(target.clone()));
    report.mutations.push(registry.enable(&alias.id));

    for other in aliases(components).filter(|a| a.id != target) {
        report.mutations.push(registry.disable(&other.id));
    }

    if let Some(main) = main_entry_point(components) {
        if main.id != target {
            report.mutations.push(registry.disable(&main.id));
        }
    }

    let failed = report.failed_components();
    if failed.is_empty() {
        info!("Icon change completed: {}", target);
    } else {
        warn!("Icon change to {} finished with failures: {:?}", target, failed);
    }
    report
}

fn reset(ctx: &HostContext<'_>) -> SwitchReport {
    info!("Resetting to default icon");
    let registry = ComponentRegistry::new(ctx.store);
    let components = registry.list_all_components();
    let main = main_entry_point(&components).map(|c| c.id.clone());

    let mut report = SwitchReport::new(SwitchOutcome::Reset, main.clone());
    match main {
        Some(ref id) => report.mutations.push(registry.enable(id)),
        None => warn!("No main entry point declared; disabling aliases only"),
    }
    for alias in aliases(&components) {
        report.mutations.push(registry.disable(&alias.id));
    }

    PendingSelection::new(ctx.preferences).clear();
    info!("Reset to default icon completed");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::RecordingTrigger;
    use crate::pending::{PENDING_ICON_KEY, PREFERENCES_NAMESPACE};
    use dynicon_core::{DeviceIdentity, EnablementState};
    use dynicon_registry::test_utils::{test_registry, UncommittedPreferences, TEST_MAIN};
    use dynicon_registry::{CatalogQuery, EnablementStore, MemoryPreferences, MemoryRegistry, PreferenceStore};
    use mockall::{mock, Sequence};

    const RED: &str = "com.example.app.IconRed";
    const BLUE: &str = "com.example.app.IconBlue";

    mock! {
        Store {}

        impl EnablementStore for Store {
            fn package_name(&self) -> &str;
            fn set_enablement(&self, id: &ComponentId, state: EnablementState) -> Result<()>;
            fn enablement_state(&self, id: &ComponentId) -> Result<EnablementState>;
            fn list_components(&self, query: CatalogQuery) -> Result<Vec<IconComponent>>;
        }
    }

    struct Fixture {
        registry: MemoryRegistry,
        prefs: MemoryPreferences,
        device: DeviceIdentity,
        trigger: Arc<RecordingTrigger>,
        switcher: IconSwitcher,
    }

    impl Fixture {
        fn new() -> Self {
            let trigger = Arc::new(RecordingTrigger::default());
            Self {
                registry: test_registry(&["IconRed", "IconBlue"]),
                prefs: MemoryPreferences::new(),
                device: DeviceIdentity::new("google", "Google", "Pixel 7"),
                switcher: IconSwitcher::new(trigger.clone()),
                trigger,
            }
        }

        fn ctx(&self) -> HostContext<'_> {
            HostContext::new(&self.registry, &self.prefs, &self.device)
        }

        fn enabled(&self) -> Vec<String> {
            let adapter = ComponentRegistry::new(&self.registry);
            adapter
                .list_all_components()
                .into_iter()
                .filter(|c| adapter.is_enabled(&c.id))
                .map(|c| c.id.into_string())
                .collect()
        }

        fn pending(&self) -> Option<String> {
            PendingSelection::new(&self.prefs).get()
        }
    }

    fn no_filter() -> BlacklistFilter {
        BlacklistFilter::default()
    }

    #[test]
    fn test_switch_converges_on_target() {
        let f = Fixture::new();
        let report = f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Applied);
        assert_eq!(report.target.as_ref().unwrap(), RED);
        assert!(report.failed_components().is_empty());
        assert_eq!(f.enabled(), vec![RED]);
        assert_eq!(f.pending(), None);
    }

    #[test]
    fn test_switch_between_aliases() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();
        f.switcher.apply_switch(&f.ctx(), ".IconBlue", &no_filter()).unwrap();

        assert_eq!(f.enabled(), vec![BLUE]);
        assert_eq!(f.switcher.current_alias(&f.ctx()).unwrap(), BLUE);
    }

    #[test]
    fn test_second_identical_switch_is_noop() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();
        let second = f.switcher.apply_switch(&f.ctx(), RED, &no_filter()).unwrap();

        assert_eq!(second.outcome, SwitchOutcome::AlreadyActive);
        assert!(!second.mutated());
        assert_eq!(f.enabled(), vec![RED]);
        assert_eq!(f.pending(), None);
    }

    #[test]
    fn test_blacklisted_device_defers_without_mutation() {
        let f = Fixture::new();
        let filter = BlacklistFilter::from_delimited(None, Some("google"), None);

        let report = f.switcher.apply_switch(&f.ctx(), "IconRed", &filter).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Deferred);
        assert!(!report.mutated());
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
        assert_eq!(f.pending(), Some("IconRed".to_string()));
        assert_eq!(f.trigger.tasks(), vec![DeferredTask::ApplyPending]);
    }

    #[test]
    fn test_non_matching_blacklist_applies_immediately() {
        let f = Fixture::new();
        let filter = BlacklistFilter::from_delimited(Some("samsung"), Some("Xiaomi"), Some("SM-G991B"));

        let report = f.switcher.apply_switch(&f.ctx(), "IconRed", &filter).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Applied);
        assert!(f.trigger.tasks().is_empty());
    }

    #[test]
    fn test_already_active_wins_over_blacklist() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();

        let filter = BlacklistFilter::from_delimited(Some("google"), None, None);
        let report = f.switcher.apply_switch(&f.ctx(), "IconRed", &filter).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::AlreadyActive);
        assert!(f.trigger.tasks().is_empty());
    }

    #[test]
    fn test_deferred_task_applies_pending_selection() {
        let f = Fixture::new();
        let filter = BlacklistFilter::from_delimited(Some("GOOGLE"), None, None);
        f.switcher.apply_switch(&f.ctx(), "IconBlue", &filter).unwrap();

        let report = f.switcher.run_deferred(&f.ctx(), DeferredTask::ApplyPending);

        assert_eq!(report.outcome, SwitchOutcome::Applied);
        assert_eq!(f.enabled(), vec![BLUE]);
        assert_eq!(f.pending(), None);
    }

    #[test]
    fn test_apply_pending_with_nothing_stored() {
        let f = Fixture::new();
        let report = f.switcher.apply_pending(&f.ctx());
        assert_eq!(report.outcome, SwitchOutcome::NothingPending);
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
    }

    #[test]
    fn test_unknown_icon_leaves_enablement_untouched() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();

        let report = f.switcher.apply_switch(&f.ctx(), "IconPurple", &no_filter()).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::UnknownIcon);
        assert!(!report.mutated());
        assert_eq!(f.enabled(), vec![RED]);
    }

    #[test]
    fn test_main_entry_point_is_not_a_switch_target() {
        let f = Fixture::new();
        let report = f.switcher.apply_switch(&f.ctx(), "MainActivity", &no_filter()).unwrap();
        assert_eq!(report.outcome, SwitchOutcome::UnknownIcon);
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
    }

    #[test]
    fn test_reset_restores_main_entry_point() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();
        f.prefs
            .put_string(PREFERENCES_NAMESPACE, PENDING_ICON_KEY, "IconBlue")
            .unwrap();

        let report = f.switcher.reset_to_default(&f.ctx());

        assert_eq!(report.outcome, SwitchOutcome::Reset);
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
        assert_eq!(f.pending(), None);
        assert_eq!(f.switcher.current_alias(&f.ctx()), None);
    }

    #[test]
    fn test_reset_from_pristine_state() {
        let f = Fixture::new();
        let report = f.switcher.reset_to_default(&f.ctx());
        assert!(report.failed_components().is_empty());
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
    }

    #[test]
    fn test_request_reset_deferred_on_blacklist() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();

        let filter = BlacklistFilter::from_delimited(None, None, Some("pixel 7"));
        let report = f.switcher.request_reset(&f.ctx(), &filter).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Deferred);
        assert_eq!(f.enabled(), vec![RED]);
        assert_eq!(f.trigger.tasks(), vec![DeferredTask::ResetToDefault]);

        f.switcher.run_deferred(&f.ctx(), DeferredTask::ResetToDefault);
        assert_eq!(f.enabled(), vec![TEST_MAIN]);
    }

    #[test]
    fn test_immediate_switch_supersedes_deferred_reset() {
        let f = Fixture::new();
        let filter = BlacklistFilter::from_delimited(Some("google"), None, None);
        f.switcher.request_reset(&f.ctx(), &filter).unwrap();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();

        let report = f.switcher.run_deferred(&f.ctx(), DeferredTask::ResetToDefault);

        assert_eq!(report.outcome, SwitchOutcome::Superseded);
        assert!(!report.mutated());
        assert_eq!(f.enabled(), vec![RED]);
    }

    #[test]
    fn test_deferred_reset_runs_once() {
        let f = Fixture::new();
        f.switcher.apply_switch(&f.ctx(), "IconRed", &no_filter()).unwrap();
        let filter = BlacklistFilter::from_delimited(None, None, Some("pixel 7"));
        f.switcher.request_reset(&f.ctx(), &filter).unwrap();

        let first = f.switcher.run_deferred(&f.ctx(), DeferredTask::ResetToDefault);
        assert_eq!(first.outcome, SwitchOutcome::Reset);
        assert_eq!(f.enabled(), vec![TEST_MAIN]);

        let second = f.switcher.run_deferred(&f.ctx(), DeferredTask::ResetToDefault);
        assert_eq!(second.outcome, SwitchOutcome::Superseded);
    }

    #[test]
    fn test_persist_failure_is_returned_before_any_mutation() {
        let registry = test_registry(&["IconRed"]);
        let prefs = UncommittedPreferences;
        let device = DeviceIdentity::default();
        let ctx = HostContext::new(&registry, &prefs, &device);
        let switcher = IconSwitcher::new(Arc::new(RecordingTrigger::default()));

        let err = switcher.apply_switch(&ctx, "IconRed", &no_filter()).unwrap_err();
        assert!(matches!(err, Error::PersistFailure { .. }));
        assert!(!ComponentRegistry::new(&registry).is_enabled(&ComponentId::new(RED)));
    }

    #[test]
    fn test_ambiguous_state_is_repaired() {
        let f = Fixture::new();
        for id in [RED, BLUE] {
            f.registry
                .set_enablement(&ComponentId::new(id), EnablementState::Enabled)
                .unwrap();
        }

        // IconBlue is last in catalog order and reads as current, but the
        // duplicate forces a full convergence instead of the no-op shortcut.
        let report = f.switcher.apply_switch(&f.ctx(), "IconBlue", &no_filter()).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Applied);
        assert_eq!(f.enabled(), vec![BLUE]);
    }

    #[test]
    fn test_supports_alternate_icons() {
        let f = Fixture::new();
        assert!(f.switcher.supports_alternate_icons(&f.ctx()));

        let single = test_registry(&[]);
        let ctx = HostContext::new(&single, &f.prefs, &f.device);
        assert!(!f.switcher.supports_alternate_icons(&ctx));
    }

    fn mock_catalog() -> Vec<IconComponent> {
        vec![
            IconComponent::main(TEST_MAIN),
            IconComponent::alias(RED, TEST_MAIN),
            IconComponent::alias(BLUE, TEST_MAIN),
        ]
    }

    #[test]
    fn test_target_enabled_before_anything_disabled() {
        let mut store = MockStore::new();
        store.expect_package_name().return_const("com.example.app".to_string());
        store.expect_list_components().returning(|_| Ok(mock_catalog()));
        store
            .expect_enablement_state()
            .returning(|_| Ok(EnablementState::Default));

        let mut seq = Sequence::new();
        store
            .expect_set_enablement()
            .withf(|id, state| id == RED && *state == EnablementState::Enabled)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store
            .expect_set_enablement()
            .withf(|id, state| id == BLUE && *state == EnablementState::Disabled)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store
            .expect_set_enablement()
            .withf(|id, state| id == TEST_MAIN && *state == EnablementState::Disabled)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let prefs = MemoryPreferences::new();
        let device = DeviceIdentity::default();
        let ctx = HostContext::new(&store, &prefs, &device);
        let switcher = IconSwitcher::new(Arc::new(RecordingTrigger::default()));

        let report = switcher.apply_switch(&ctx, "IconRed", &no_filter()).unwrap();
        assert_eq!(report.mutations.len(), 3);
    }

    #[test]
    fn test_mutation_failures_do_not_abort_convergence() {
        let mut store = MockStore::new();
        store.expect_package_name().return_const("com.example.app".to_string());
        store.expect_list_components().returning(|_| Ok(mock_catalog()));
        store
            .expect_enablement_state()
            .returning(|_| Ok(EnablementState::Default));
        store.expect_set_enablement().times(3).returning(|id, _| {
            if id == BLUE {
                Err(Error::component_mutation(id.as_str(), "permission denied"))
            } else {
                Ok(())
            }
        });

        let prefs = MemoryPreferences::new();
        let device = DeviceIdentity::default();
        let ctx = HostContext::new(&store, &prefs, &device);
        let switcher = IconSwitcher::new(Arc::new(RecordingTrigger::default()));

        let report = switcher.apply_switch(&ctx, "IconRed", &no_filter()).unwrap();

        assert_eq!(report.outcome, SwitchOutcome::Applied);
        assert_eq!(report.mutations.len(), 3);
        assert_eq!(report.failed_components(), vec![&ComponentId::new(BLUE)]);
    }

    #[test]
    fn test_unreadable_catalog_reports_unknown_icon() {
        let mut store = MockStore::new();
        store.expect_package_name().return_const("com.example.app".to_string());
        store
            .expect_list_components()
            .returning(|_| Err(Error::catalog_not_found("com.example.app")));
        store.expect_set_enablement().never();

        let prefs = MemoryPreferences::new();
        let device = DeviceIdentity::default();
        let ctx = HostContext::new(&store, &prefs, &device);
        let switcher = IconSwitcher::new(Arc::new(RecordingTrigger::default()));

        let report = switcher.apply_switch(&ctx, "IconRed", &no_filter()).unwrap();
        assert_eq!(report.outcome, SwitchOutcome::UnknownIcon);
    }

    #[test]
    fn test_concurrent_requests_end_converged() {
        let registry = Arc::new(test_registry(&["IconRed", "IconBlue"]));
        let prefs = Arc::new(MemoryPreferences::new());
        let switcher = Arc::new(IconSwitcher::new(Arc::new(RecordingTrigger::default())));

        let handles: Vec<_> = ["IconRed", "IconBlue", "IconRed", "IconBlue"]
            .into_iter()
            .map(|name| {
                let registry = registry.clone();
                let prefs = prefs.clone();
                let switcher = switcher.clone();
                std::thread::spawn(move || {
                    let device = DeviceIdentity::default();
                    let ctx = HostContext::new(registry.as_ref(), prefs.as_ref(), &device);
                    switcher.apply_switch(&ctx, name, &BlacklistFilter::default()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let adapter = ComponentRegistry::new(registry.as_ref());
        let enabled: Vec<_> = adapter
            .list_all_components()
            .into_iter()
            .filter(|c| adapter.is_enabled(&c.id))
            .collect();
        assert_eq!(enabled.len(), 1);
        assert!(enabled[0].is_alias());
    }
}
