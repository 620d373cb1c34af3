/// Display-only elapsed timer for the take screen.
///
/// The label is derived from `Date.now()` minus the captured session start on
/// every tick, so a delayed or skipped interval never accumulates drift. The
/// submitted completion time is computed separately in the services layer;
/// this script only paints.
pub(super) fn take_timer_script(timer_key: &str, start_ms: i64, active: bool) -> String {
    format!(
        r#"(function() {{
                    const root = document.getElementById("take-root");
                    const state = window.__quizTakeTimer || (window.__quizTakeTimer = {{
                        key: null,
                        startMs: 0,
                        id: null,
                    }});
                    if (!root) {{
                        if (state.id) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                        state.key = null;
                        return;
                    }}
                    const key = {timer_key:?};
                    const startMs = {start_ms};
                    const active = {active};
                    if (state.key !== key) {{
                        state.key = key;
                        state.startMs = startMs;
                    }}
                    const label = document.getElementById("take-timer-label");
                    const paint = () => {{
                        if (!label) return;
                        const elapsed = Math.max(0, Math.floor((Date.now() - state.startMs) / 1000));
                        const minutes = Math.floor(elapsed / 60);
                        const seconds = String(elapsed % 60).padStart(2, "0");
                        label.textContent = minutes + ":" + seconds;
                    }};
                    paint();
                    if (!active) {{
                        if (state.id) {{
                            clearInterval(state.id);
                            state.id = null;
                        }}
                        return;
                    }}
                    if (!state.id) {{
                        state.id = setInterval(() => {{
                            if (!document.getElementById("take-root")) {{
                                clearInterval(state.id);
                                state.id = null;
                                return;
                            }}
                            paint();
                        }}, 1000);
                    }}
                }})();"#,
        timer_key = timer_key,
        start_ms = start_ms,
        active = active,
    )
}
