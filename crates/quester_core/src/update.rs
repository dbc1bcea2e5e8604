use crate::{
    search_url, AppState, Effect, MarkOutcome, Msg, QueryItem, CELEBRATION_DURATION, TOAST_DURATION,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CountChanged(count) => {
            state.set_count(count);
            Vec::new()
        }
        Msg::TimerChanged(seconds) => {
            state.set_timer_seconds(seconds);
            Vec::new()
        }
        Msg::VolumeChanged(volume) => {
            state.set_volume(volume);
            Vec::new()
        }
        Msg::MuteToggled => {
            state.toggle_mute();
            Vec::new()
        }
        Msg::FetchClicked => {
            // Overlapping requests are not rejected here; the presentation layer
            // disables the control while `busy` is set.
            let (request, size) = state.begin_request();
            vec![Effect::RequestBatch { request, size }]
        }
        Msg::BatchLoaded {
            request,
            queries,
            origin,
        } => {
            // Unknown or already resolved requests are dropped.
            state.finish_request(request, queries, origin);
            Vec::new()
        }
        Msg::CopyClicked(item) => {
            let mut effects = vec![Effect::CopyToClipboard {
                text: item.text.clone(),
            }];
            effects.extend(state.cue_volume().map(|volume| Effect::PlayCue { volume }));
            let outcome = state.mark_done(&item);
            effects.extend(celebrate(&mut state, &outcome));
            effects
        }
        Msg::OpenClicked(item) => {
            let mut effects = vec![Effect::OpenUrl {
                url: search_url(&item.text),
            }];
            let outcome = state.mark_done(&item);
            effects.extend(celebrate(&mut state, &outcome));
            effects.extend(start_countdown(&mut state, item));
            effects
        }
        Msg::CountdownTick(timer) => {
            state.tick_countdown(timer);
            Vec::new()
        }
        Msg::CountdownExpired(timer) => match state.expire_countdown(timer) {
            Some(item) => {
                let mut effects = Vec::with_capacity(2);
                effects.extend(state.cue_volume().map(|volume| Effect::PlayCue { volume }));
                effects.push(Effect::ShowToast {
                    message: format!("\"{}\" timer done!", item.text),
                    duration: TOAST_DURATION,
                });
                effects
            }
            None => Vec::new(),
        },
        Msg::CelebrationElapsed(celebration) => {
            state.end_celebration(celebration);
            Vec::new()
        }
        Msg::ClearHistoryClicked => {
            state.clear_history();
            Vec::new()
        }
        Msg::Teardown => state
            .cancel_countdowns()
            .map(|timer| Effect::CancelCountdown { timer })
            .into_iter()
            .collect(),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn celebrate(state: &mut AppState, outcome: &MarkOutcome) -> Option<Effect> {
    state
        .celebrate(outcome)
        .map(|celebration| Effect::ScheduleCelebrationEnd {
            celebration,
            after: CELEBRATION_DURATION,
        })
}

fn start_countdown(state: &mut AppState, item: QueryItem) -> Vec<Effect> {
    let seconds = state.timer_seconds();
    let start = state.start_countdown(item);
    let mut effects = Vec::with_capacity(2);
    if let Some(timer) = start.cancelled {
        effects.push(Effect::CancelCountdown { timer });
    }
    effects.push(Effect::StartCountdown {
        timer: start.timer,
        seconds,
    });
    effects
}
