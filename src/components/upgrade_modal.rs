use yew::prelude::*;

use super::stats_panel::tier_color;
use crate::model::Tier;

#[derive(Properties, PartialEq, Clone)]
pub struct UpgradeModalProps {
    pub show: bool,
    pub current: Tier,
    /// None at the top tier; the modal then renders nothing.
    pub next: Option<Tier>,
    pub next_duration_secs: Option<u64>,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn UpgradeModal(props: &UpgradeModalProps) -> Html {
    let Some(next) = props.next.filter(|_| props.show) else {
        return html! {};
    };
    let confirm_cb = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cancel_cb = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let color = tier_color(next.level);
    let next_hours = props.next_duration_secs.unwrap_or(next.duration_secs) / 3600;

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <h3 style="margin:0; font-size:18px;">{ format!("Upgrade to tier {}", next.level) }</h3>
            <div style="font-size:13px; line-height:1.4; opacity:0.85;">
                { format!("Runs grow from {}h to {}h and earn {:.2} AIQX per hour.", props.current.hours(), next_hours, next.hourly_rate) }
            </div>
            <div style={format!("display:flex; justify-content:space-between; border:1px solid {}; border-radius:8px; padding:8px 12px;", color)}>
                <span>{"UPGRADE FEE"}</span>
                <span style={format!("color:{}; font-weight:600;", color)}>{ format!("{} AIQX", next.upgrade_cost) }</span>
            </div>
            <div style="font-size:11px; opacity:0.7;">{"The current run restarts under the new tier; unclaimed progress is lost."}</div>
            <div style="display:flex; gap:10px; justify-content:flex-end;">
                <button onclick={cancel_cb} style="min-width:90px;">{"Cancel"}</button>
                <button onclick={confirm_cb} style={format!("min-width:110px; background:{}; border:1px solid {}; color:#0d1117;", color, color)}>{"Confirm"}</button>
            </div>
        </div>
    </div>}
}
