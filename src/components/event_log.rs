use std::rc::Rc;

use yew::prelude::*;
use yew_deepzoom_gestures::ViewerEvent;
use yew_deepzoom_gestures::util::format_duration_ms;

/// Most recent entries kept by the log.
pub const LOG_CAPACITY: usize = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub seq: u64,
    pub event: ViewerEvent,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLogState {
    pub entries: Vec<LogEntry>,
    seq: u64,
}

pub enum LogAction {
    Push(ViewerEvent),
    Clear,
}

impl Reducible for EventLogState {
    type Action = LogAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            LogAction::Push(event) => {
                next.seq += 1;
                push_entry(&mut next.entries, next.seq, event);
            }
            LogAction::Clear => next.entries.clear(),
        }
        Rc::new(next)
    }
}

/// Push an event, dropping the oldest entries beyond [`LOG_CAPACITY`].
pub fn push_entry(entries: &mut Vec<LogEntry>, seq: u64, event: ViewerEvent) {
    entries.push(LogEntry { seq, event });
    if entries.len() > LOG_CAPACITY {
        let excess = entries.len() - LOG_CAPACITY;
        entries.drain(..excess);
    }
}

pub fn describe(event: &ViewerEvent) -> String {
    match event {
        ViewerEvent::PanEnd {
            duration_ms,
            moved_x,
            moved_y,
        } => format!(
            "panend {} ({:+.0}, {:+.0})",
            format_duration_ms(*duration_ms),
            moved_x,
            moved_y
        ),
        ViewerEvent::Update { types } => format!("update [{}]", types.join(", ")),
        other => other.name().to_string(),
    }
}

fn color(event: &ViewerEvent) -> &'static str {
    match event {
        ViewerEvent::PanStart | ViewerEvent::PanEnd { .. } => "#58a6ff",
        ViewerEvent::PinchStart | ViewerEvent::PinchEnd => "#d29922",
        ViewerEvent::Update { .. } => "#8b949e",
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct EventLogProps {
    pub entries: Vec<LogEntry>,
    pub on_clear: Callback<()>,
}

#[function_component]
pub fn EventLog(props: &EventLogProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let seq_style = "width:36px; text-align:right; opacity:0.6; font-variant-numeric:tabular-nums;";
    let clear_cb = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:260px; display:flex; flex-direction:column; gap:6px; font-size:13px; pointer-events:auto;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <span style="font-weight:600;">{"Events"}</span>
                <button onclick={clear_cb} style="padding:2px 6px; font-size:11px;">{"Clear"}</button>
            </div>
            { for props.entries.iter().rev().map(|entry| html! {
                <div key={entry.seq} style={row_style}>
                    <span style={seq_style}>{ entry.seq }</span>
                    <span style={format!("color:{};", color(&entry.event))}>{ describe(&entry.event) }</span>
                </div>
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_most_recent() {
        let mut entries = Vec::new();
        for seq in 0..20 {
            push_entry(&mut entries, seq, ViewerEvent::PanStart);
        }
        assert_eq!(entries.len(), LOG_CAPACITY);
        assert_eq!(entries[0].seq, 8);
        assert_eq!(entries.last().map(|e| e.seq), Some(19));
    }

    #[test]
    fn describes_pan_end_and_updates() {
        let end = ViewerEvent::PanEnd {
            duration_ms: 300.0,
            moved_x: 25.0,
            moved_y: -35.0,
        };
        assert_eq!(describe(&end), "panend 300ms (+25, -35)");
        let update = ViewerEvent::Update {
            types: vec!["drag".into(), "wheel".into()],
        };
        assert_eq!(describe(&update), "update [drag, wheel]");
        assert_eq!(describe(&ViewerEvent::PinchStart), "pinchstart");
    }

    #[test]
    fn clear_keeps_numbering() {
        let state = Rc::new(EventLogState::default());
        let state = state.reduce(LogAction::Push(ViewerEvent::PanStart));
        let state = state.reduce(LogAction::Clear);
        let state = state.reduce(LogAction::Push(ViewerEvent::PinchStart));
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].seq, 2);
    }
}
