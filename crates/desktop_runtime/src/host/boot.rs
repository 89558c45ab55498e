use leptos::{create_effect, logging, spawn_local, Callable, Callback};

use crate::{host::DesktopHostContext, persistence, reducer::DesktopAction};

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let dispatch = dispatch;
        let host = host.clone();
        spawn_local(async move {
            let config = persistence::load_config(host.services().prefs.as_ref()).await;
            dispatch.call(DesktopAction::ApplyConfig(config));

            match host.persistence().load().await {
                Some(records) => {
                    logging::log!(
                        "restoring {} desktop windows ({} host)",
                        records.len(),
                        host.host_strategy_name()
                    );
                    dispatch.call(DesktopAction::HydrateLayout { records });
                }
                None => logging::log!("no saved desktop layout"),
            }
        });
    });
}
