use engine::TrackListEntry;
use iced::widget::{button, column, scrollable, text};
use iced::{Element, Length};

/// Message for clicking `entry`. The selected entry stays clickable so that
/// picking it again restores the full range.
fn select_message<Message>(
    entry: &TrackListEntry,
    switch_enabled: bool,
    on_select: fn(usize) -> Message,
) -> Option<Message> {
    switch_enabled.then(|| on_select(entry.index))
}

/// Renders the track list; entries are clickable only when `switch_enabled`.
pub fn view<'a, Message>(
    tracks: &'a [TrackListEntry],
    switch_enabled: bool,
    on_select: fn(usize) -> Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let entries = tracks.iter().map(|entry| {
        let label = if entry.selected {
            format!("> {}", entry.file_name)
        } else {
            entry.file_name.clone()
        };
        let style = if entry.selected {
            button::primary
        } else {
            button::secondary
        };
        button(text(label))
            .width(Length::Fill)
            .style(style)
            .on_press_maybe(select_message(entry, switch_enabled, on_select))
            .into()
    });

    scrollable(column(entries).spacing(4))
        .width(Length::Fixed(220.0))
        .height(Length::Fill)
        .into()
}
