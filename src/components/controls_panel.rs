use yew::prelude::*;

use crate::model::Phase;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub phase: Phase,
    pub can_upgrade: bool,
    pub notice: Option<String>,
    pub on_start: Callback<()>,
    pub on_claim: Callback<()>,
    pub on_upgrade: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_dismiss: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let claim_cb = {
        let cb = props.on_claim.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let upgrade_cb = {
        let cb = props.on_upgrade.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let dismiss_cb = {
        let cb = props.on_dismiss.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let main_button = match props.phase {
        Phase::Idle => html! { <button onclick={start_cb}>{"Start Mining"}</button> },
        Phase::Running => html! { <button disabled={true}>{"Mining..."}</button> },
        Phase::ReadyToClaim => html! { <button onclick={claim_cb} style="background:#2ea043; border:1px solid #238636; color:#fff;">{"Claim"}</button> },
    };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        { main_button }
        <button onclick={upgrade_cb} disabled={!props.can_upgrade}>{ if props.can_upgrade { "Upgrade" } else { "Max Tier" } }</button>
        <button onclick={reset_cb} style="background:#3b1d1d; border:1px solid #5d2d2d;">{"Reset (testing)"}</button>
        { if let Some(txt) = &props.notice { html!{ <div onclick={dismiss_cb} style="font-size:11px; line-height:1.2; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px; cursor:pointer;">{ txt.clone() }</div> } } else { html!{} } }
    </div>}
}
