use crate::model::Phase;
use crate::util::{format_balance, format_countdown};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TimeDisplayProps {
    pub phase: Phase,
    pub remaining_secs: f64,
    /// Run completion in [0, 1].
    pub progress: f64,
    pub estimated_reward: f64,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    let headline = match props.phase {
        Phase::Idle => "Not mining".to_string(),
        Phase::Running => format_countdown(props.remaining_secs),
        Phase::ReadyToClaim => "Ready to claim".to_string(),
    };
    let pct = (props.progress * 100.0).clamp(0.0, 100.0);
    html! {<div style="position:absolute; top:40%; left:50%; transform:translate(-50%, -50%); display:flex; flex-direction:column; align-items:center; gap:10px; min-width:320px;">
        <div style="font-size:28px; font-weight:600; font-variant-numeric:tabular-nums;">{ headline }</div>
        <div style="width:100%; height:10px; background:#161b22; border:1px solid #30363d; border-radius:5px; overflow:hidden;">
            <div style={format!("width:{:.2}%; height:100%; background:#58a6ff;", pct)}></div>
        </div>
        <div style="font-size:13px; opacity:0.8;">{ format!("{:.1}% · accumulating {} AIQX", pct, format_balance(props.estimated_reward)) }</div>
    </div>}
}
