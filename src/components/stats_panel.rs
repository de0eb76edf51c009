use yew::prelude::*;

use crate::util::format_balance;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub balance: f64,
    pub tier_level: u8,
    pub hourly_rate: f64,
    pub persistent: bool,
}

/// Accent colour per tier: gold, green, purple, orange.
pub fn tier_color(level: u8) -> &'static str {
    match level {
        1 => "#00FF7F",
        2 => "#9333EA",
        3 => "#FF7A1A",
        _ => "#DAA520",
    }
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let color = tier_color(props.tier_level);
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:110px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:260px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:{};", label_style, color)}>{"AIQX Balance"}</span>
                <span style={format!("{} color:{};", value_style, color)}>{ format_balance(props.balance) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Tier"}</span>
                <span style={value_style}>{ props.tier_level }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Rate"}</span>
                <span style={value_style}>{ format!("{:.2} / h", props.hourly_rate) }</span>
            </div>
            { if !props.persistent { html!{ <div style="font-size:11px; color:#f0883e;">{"Storage unavailable: progress resets on reload."}</div> } } else { html!{} } }
        </div>
    }
}
