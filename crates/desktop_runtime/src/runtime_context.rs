//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, host bootstrap
//! wiring, and the router bridge. UI composition stays in [`crate::components`].
#![allow(clippy::clone_on_copy)]

use leptos::*;
use platform_host::HostServices;

use crate::{
    content::ContentRegistry,
    effect_executor,
    host::DesktopHostContext,
    interaction::InteractionState,
    navigation::RouteTable,
    reducer::{reduce_desktop, DesktopAction, DesktopState, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the host.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
    /// Content factories keyed by window kind.
    pub content: StoredValue<ContentRegistry>,
    /// Router navigation supplied by the entry layer.
    pub navigate: Callback<String>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext, location: Signal<String>) {
    runtime
        .host
        .get_value()
        .install_boot_hydration(runtime.dispatch);
    effect_executor::install(runtime);

    create_effect(move |_| {
        let location = location.get();
        runtime.dispatch_action(DesktopAction::RouteChanged { location });
    });

    on_cleanup(move || runtime.host.get_value().cancel_all_timers());
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Injected browser or test host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Static path to window-kind table.
    routes: RouteTable,
    /// Window body factories.
    content: ContentRegistry,
    /// Current router location (path plus query).
    #[prop(into)]
    location: Signal<String>,
    /// Navigates the router to a location.
    navigate: Callback<String>,
    children: Children,
) -> impl IntoView {
    for kind in content.missing_kinds() {
        logging::warn!("no content registered for window type `{kind}`");
    }

    let host = store_value(DesktopHostContext::new(host_services));
    let mut initial = DesktopState::new(Default::default(), routes);
    initial.viewport = host.get_value().desktop_viewport_rect();
    let state = create_rw_signal(initial);
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let content = store_value(content);

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        interaction,
        effects,
        dispatch,
        content,
        navigate,
    };

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime, location);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
