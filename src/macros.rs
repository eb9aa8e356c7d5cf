/// Key press pattern or value; the key code is passed as raw tokens so it works in patterns
#[macro_export]
macro_rules! key_event {
    ($modifiers:ident, $($code:tt)+) => {
        ::crossterm::event::KeyEvent {
            code: $($code)+,
            modifiers: ::crossterm::event::KeyModifiers::$modifiers,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        }
    };
}

/// Plain key press, `key!('r')` or `key!(Enter)`
#[macro_export]
macro_rules! key {
    ($key:literal) => {
        $crate::key_event!(NONE, ::crossterm::event::KeyCode::Char($key))
    };
    ($key:ident) => {
        $crate::key_event!(NONE, ::crossterm::event::KeyCode::$key)
    };
}

#[macro_export]
macro_rules! ctrl {
    ($key:literal) => {
        $crate::key_event!(CONTROL, ::crossterm::event::KeyCode::Char($key))
    };
}

#[macro_export]
macro_rules! shift {
    ($key:literal) => {
        $crate::key_event!(SHIFT, ::crossterm::event::KeyCode::Char($key))
    };
}
