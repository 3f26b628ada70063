use std::time::{Duration, Instant};

/// Через сколько уведомление закрывается само, если его не закрыли вручную.
pub const AUTO_HIDE_AFTER: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Вид уведомления редактора профиля.
pub enum NotificationKind {
    /// Профиль обновлён.
    Success,
    /// Обновление не удалось (токен, сеть или ответ сервера).
    Failure,
    /// Имя пользователя не прошло проверку.
    NameWarning,
    /// Телефон не прошёл проверку.
    PhoneWarning,
}

impl NotificationKind {
    /// Все виды уведомлений.
    pub const ALL: [Self; 4] = [
        Self::Success,
        Self::Failure,
        Self::NameWarning,
        Self::PhoneWarning,
    ];

    /// Текст, который показывается пользователю.
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Information has been updated successfully!",
            Self::Failure => "Something went wrong. Please try again later!",
            Self::NameWarning => "Username must be at least 6 characters long. Please try again.",
            Self::PhoneWarning => {
                "Phone number must be 10 digits and contain no special characters. Please try again."
            }
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::NameWarning => 2,
            Self::PhoneWarning => 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Четыре независимых уведомления; у каждого хранится момент показа.
pub struct Notifications {
    shown_at: [Option<Instant>; 4],
}

impl Notifications {
    /// Показывает уведомление, отсчитывая время автозакрытия от `now`.
    pub fn show_at(&mut self, kind: NotificationKind, now: Instant) {
        self.shown_at[kind.slot()] = Some(now);
    }

    /// Показывает уведомление начиная с текущего момента.
    pub fn show(&mut self, kind: NotificationKind) {
        self.show_at(kind, Instant::now());
    }

    /// Закрывает уведомление; остальные не меняются.
    pub fn close(&mut self, kind: NotificationKind) {
        self.shown_at[kind.slot()] = None;
    }

    /// Закрывает все уведомления.
    pub fn clear(&mut self) {
        self.shown_at = [None; 4];
    }

    /// Показано ли уведомление сейчас.
    pub fn is_open(&self, kind: NotificationKind) -> bool {
        self.shown_at[kind.slot()].is_some()
    }

    /// Открытые уведомления в порядке [`NotificationKind::ALL`].
    pub fn open(&self) -> Vec<NotificationKind> {
        NotificationKind::ALL
            .into_iter()
            .filter(|kind| self.is_open(*kind))
            .collect()
    }

    /// Закрывает уведомления, показанные [`AUTO_HIDE_AFTER`] или раньше до `now`.
    pub fn expire(&mut self, now: Instant) {
        for slot in &mut self.shown_at {
            if slot.is_some_and(|shown| now.saturating_duration_since(shown) >= AUTO_HIDE_AFTER) {
                *slot = None;
            }
        }
    }

    /// Ближайший момент, когда какое-то уведомление закроется само.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.shown_at
            .iter()
            .flatten()
            .map(|shown| *shown + AUTO_HIDE_AFTER)
            .min()
    }
}
