//! Virtual-key labels for keyboard actions.

// Win32-style virtual key codes; these are the codes hooks report and the
// codes stored in recordings, regardless of the backend in use.
pub const VK_LBUTTON: i32 = 0x01;
pub const VK_RBUTTON: i32 = 0x02;
pub const VK_MBUTTON: i32 = 0x04;
pub const VK_BACK: i32 = 0x08;
pub const VK_TAB: i32 = 0x09;
pub const VK_RETURN: i32 = 0x0D;
pub const VK_SHIFT: i32 = 0x10;
pub const VK_CONTROL: i32 = 0x11;
pub const VK_MENU: i32 = 0x12;
pub const VK_CAPITAL: i32 = 0x14;
pub const VK_ESCAPE: i32 = 0x1B;
pub const VK_SPACE: i32 = 0x20;
pub const VK_PRIOR: i32 = 0x21;
pub const VK_NEXT: i32 = 0x22;
pub const VK_END: i32 = 0x23;
pub const VK_HOME: i32 = 0x24;
pub const VK_LEFT: i32 = 0x25;
pub const VK_UP: i32 = 0x26;
pub const VK_RIGHT: i32 = 0x27;
pub const VK_DOWN: i32 = 0x28;
pub const VK_INSERT: i32 = 0x2D;
pub const VK_DELETE: i32 = 0x2E;

/// Human label for a virtual key code, or a hex fallback.
///
/// Letters and digits map to themselves; common control keys get their
/// conventional names. Returns `None` only for codes outside 0..=255.
pub fn key_label(vk: i32) -> Option<String> {
    if !(0..=255).contains(&vk) {
        return None;
    }

    let label = match vk {
        VK_ESCAPE => "Esc".to_string(),
        VK_TAB => "Tab".to_string(),
        VK_CAPITAL => "CapsLock".to_string(),
        VK_SHIFT => "Shift".to_string(),
        VK_CONTROL => "Ctrl".to_string(),
        VK_MENU => "Alt".to_string(),
        VK_SPACE => "Space".to_string(),
        VK_RETURN => "Enter".to_string(),
        VK_BACK => "Backspace".to_string(),
        VK_DELETE => "Delete".to_string(),
        VK_INSERT => "Insert".to_string(),
        VK_HOME => "Home".to_string(),
        VK_END => "End".to_string(),
        VK_PRIOR => "PageUp".to_string(),
        VK_NEXT => "PageDown".to_string(),
        VK_LEFT => "Left".to_string(),
        VK_UP => "Up".to_string(),
        VK_RIGHT => "Right".to_string(),
        VK_DOWN => "Down".to_string(),
        VK_LBUTTON => "LButton".to_string(),
        VK_RBUTTON => "RButton".to_string(),
        VK_MBUTTON => "MButton".to_string(),
        // '0'..'9' and 'A'..'Z' are their own labels
        0x30..=0x39 | 0x41..=0x5A => char::from(vk as u8).to_string(),
        other => format!("0x{:02X}", other),
    };

    Some(label)
}
