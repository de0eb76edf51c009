use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use super::{
    controls_panel::ControlsPanel, stats_panel::StatsPanel, time_display::TimeDisplay,
    upgrade_modal::UpgradeModal,
};
use crate::engine::{MiningAction, MiningEngine, Notice};
use crate::model::TICK_INTERVAL_MS;
use crate::state::LocalStore;
use crate::util::format_balance;

fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Claimed { amount } => format!("+{} AIQX claimed", format_balance(*amount)),
        Notice::Upgraded { level, restarted: true } => {
            format!("Upgraded to tier {}. Mining restarted.", level)
        }
        Notice::Upgraded { level, restarted: false } => format!("Upgraded to tier {}.", level),
        Notice::Rejected(e) => e.to_string(),
        Notice::StorageDegraded(e) => format!("{}. Progress is kept for this visit only.", e),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let engine = use_reducer(|| MiningEngine::load(Rc::new(LocalStore)));
    let show_upgrade = use_state(|| false);

    // Tick source: one interval for the lifetime of the app
    {
        let dispatcher = engine.dispatcher();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            // first reading applies any time that passed while the app was closed
            dispatcher.dispatch(MiningAction::Tick {
                now_ms: js_sys::Date::now(),
            });
            let tick = Closure::wrap(Box::new(move || {
                dispatcher.dispatch(MiningAction::Tick {
                    now_ms: js_sys::Date::now(),
                });
            }) as Box<dyn FnMut()>);
            let tick_id = window.as_ref().and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    TICK_INTERVAL_MS,
                )
                .ok()
            });
            if tick_id.is_none() {
                warn!("could not install the mining tick interval");
            }
            move || {
                if let (Some(w), Some(id)) = (window, tick_id) {
                    w.clear_interval_with_handle(id);
                }
                drop(tick);
            }
        });
    }

    let on_start = {
        let engine = engine.clone();
        Callback::from(move |_| engine.dispatch(MiningAction::Start))
    };
    let on_claim = {
        let engine = engine.clone();
        Callback::from(move |_| engine.dispatch(MiningAction::Claim))
    };
    let on_dismiss = {
        let engine = engine.clone();
        Callback::from(move |_| engine.dispatch(MiningAction::DismissNotice))
    };
    let on_reset = {
        let engine = engine.clone();
        Callback::from(move |_| {
            let confirmed = web_sys::window()
                .map(|win| {
                    win.confirm_with_message(
                        "Reset mining to tier 0 and wipe the balance? This is a testing tool.",
                    )
                    .unwrap_or(false)
                })
                .unwrap_or(true);
            if confirmed {
                engine.dispatch(MiningAction::Reset);
            }
        })
    };
    // Upgrades go through the confirmation modal
    let open_upgrade = {
        let show_upgrade = show_upgrade.clone();
        Callback::from(move |_| show_upgrade.set(true))
    };
    let cancel_upgrade = {
        let show_upgrade = show_upgrade.clone();
        Callback::from(move |_| show_upgrade.set(false))
    };
    let confirm_upgrade = {
        let engine = engine.clone();
        let show_upgrade = show_upgrade.clone();
        Callback::from(move |_| {
            engine.dispatch(MiningAction::Upgrade);
            show_upgrade.set(false);
        })
    };

    let session = engine.session();
    let notice = engine.notice().map(notice_text);

    html! {
        <div style="position:relative; width:100vw; height:100vh; background:#0d1117; color:#e6edf3; overflow:hidden;">
            <StatsPanel
                balance={session.total_balance()}
                tier_level={session.tier_level()}
                hourly_rate={session.tier().hourly_rate}
                persistent={engine.is_persistent()}
            />
            <TimeDisplay
                phase={session.phase()}
                remaining_secs={session.remaining_secs()}
                progress={session.progress_fraction()}
                estimated_reward={session.estimated_reward()}
            />
            <ControlsPanel
                phase={session.phase()}
                can_upgrade={session.can_upgrade()}
                notice={notice}
                on_start={on_start}
                on_claim={on_claim}
                on_upgrade={open_upgrade}
                on_reset={on_reset}
                on_dismiss={on_dismiss}
            />
            <UpgradeModal
                show={*show_upgrade}
                current={*session.tier()}
                next={session.next_tier().copied()}
                next_duration_secs={session.next_tier_duration_secs()}
                on_confirm={confirm_upgrade}
                on_cancel={cancel_upgrade}
            />
        </div>
    }
}
