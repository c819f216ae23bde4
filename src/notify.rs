//! Closed set of user-facing notifications.
//!
//! Routes never flash free-form strings. They pick a [`Notice`] and the
//! title, description and auto-dismiss duration are derived here, so the
//! operator-facing copy stays in one place. The notice is serialized as
//! JSON into a flash message and decoded back by `base_context` on the
//! next request.

use actix_web_flash_messages::{FlashMessage, Level as FlashLevel};
use serde::{Deserialize, Serialize};

use crate::forms::FormIssue;

/// Severity of an [`Alert`], also its badge style in templates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    /// Dismiss delay used when a flash arrives without one.
    const fn default_duration_ms(self) -> u32 {
        match self {
            Self::Success | Self::Info => 3000,
            Self::Error | Self::Warning => 4000,
        }
    }
}

impl From<FlashLevel> for Level {
    fn from(level: FlashLevel) -> Self {
        match level {
            FlashLevel::Success => Self::Success,
            FlashLevel::Error => Self::Error,
            FlashLevel::Warning => Self::Warning,
            FlashLevel::Info | FlashLevel::Debug => Self::Info,
        }
    }
}

/// Rendered toast: what the templates actually display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub level: Level,
    pub title: String,
    pub description: String,
    pub duration_ms: u32,
}

impl Alert {
    fn new(level: Level, title: String, description: String, duration_ms: u32) -> Self {
        Self {
            level,
            title,
            description,
            duration_ms,
        }
    }
}

/// Record kind referenced by entity-scoped notices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Entity {
    Category,
    User,
}

impl Entity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Kategori",
            Self::User => "User",
        }
    }

    const fn label_lower(self) -> &'static str {
        match self {
            Self::Category => "kategori",
            Self::User => "user",
        }
    }
}

/// Everything the dashboard may tell the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    // Authentication
    LoginSuccess { username: String },
    LoginError { message: Option<String> },
    RegisterSuccess,
    RegisterError { message: Option<String> },
    LogoutSuccess,
    LogoutError,
    SessionExpired,
    Unauthorized,
    // Record mutations
    CreateSuccess(Entity),
    CreateError(Entity),
    UpdateSuccess(Entity),
    UpdateError(Entity),
    DeleteSuccess(Entity),
    DeleteError(Entity),
    RestoreSuccess(Entity),
    RestoreError(Entity),
    // Active flag changes
    Activated(Entity),
    Deactivated(Entity),
    StatusChangeError(Entity),
    // Listing loads
    FetchError(Entity),
    NetworkError,
    ServerError,
    // Form validation
    InvalidInput(FormIssue),
    // File handling
    UploadSuccess { file_name: String },
    UploadError { file_name: String },
    FileTooBig { max_size: String },
    InvalidFileType { allowed: String },
    // Bulk operations
    BatchDeleteSuccess { count: usize, entity: Entity },
    BatchDeleteError { count: usize, entity: Entity },
    ExportSuccess { entity: Entity, format: String },
    ExportError(Entity),
    ImportSuccess { count: usize, entity: Entity },
    ImportError { message: Option<String> },
    // Permissions
    AccessDenied { resource: String },
    RoleChanged { role: String },
    PermissionGranted { permission: String },
    // Pushed updates
    NewMessage { sender: String },
    DataUpdated(Entity),
    Notification { title: String, message: String },
}

impl Notice {
    /// The alert this notice renders as.
    pub fn alert(&self) -> Alert {
        match self {
            Notice::LoginSuccess { username } => Alert::new(
                Level::Success,
                format!("Selamat datang, {username}!"),
                "Anda berhasil masuk ke dashboard".to_string(),
                3000,
            ),
            Notice::LoginError { message } => Alert::new(
                Level::Error,
                "Login Gagal".to_string(),
                message
                    .clone()
                    .unwrap_or_else(|| "Email atau password salah".to_string()),
                5000,
            ),
            Notice::RegisterSuccess => Alert::new(
                Level::Success,
                "Registrasi Berhasil!".to_string(),
                "Akun Anda telah dibuat. Silakan login".to_string(),
                4000,
            ),
            Notice::RegisterError { message } => Alert::new(
                Level::Error,
                "Registrasi Gagal".to_string(),
                message
                    .clone()
                    .unwrap_or_else(|| "Gagal membuat akun".to_string()),
                5000,
            ),
            Notice::LogoutSuccess => Alert::new(
                Level::Success,
                "Logout Berhasil".to_string(),
                "Anda telah keluar dari aplikasi".to_string(),
                3000,
            ),
            Notice::LogoutError => Alert::new(
                Level::Error,
                "Gagal Logout".to_string(),
                "Silakan coba lagi".to_string(),
                4000,
            ),
            Notice::SessionExpired => Alert::new(
                Level::Warning,
                "Sesi Berakhir".to_string(),
                "Silakan login kembali untuk melanjutkan".to_string(),
                5000,
            ),
            Notice::Unauthorized => Alert::new(
                Level::Error,
                "Akses Ditolak".to_string(),
                "Anda tidak memiliki izin untuk mengakses halaman ini".to_string(),
                4000,
            ),
            Notice::CreateSuccess(entity) => Alert::new(
                Level::Success,
                format!("{} Berhasil Dibuat", entity.label()),
                format!("{} baru telah ditambahkan", entity.label()),
                3000,
            ),
            Notice::CreateError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Membuat {}", entity.label()),
                "Silakan periksa input dan coba lagi".to_string(),
                4000,
            ),
            Notice::UpdateSuccess(entity) => Alert::new(
                Level::Success,
                format!("{} Berhasil Diperbarui", entity.label()),
                format!("Perubahan {} telah disimpan", entity.label_lower()),
                3000,
            ),
            Notice::UpdateError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Memperbarui {}", entity.label()),
                "Silakan coba lagi".to_string(),
                4000,
            ),
            Notice::DeleteSuccess(entity) => Alert::new(
                Level::Success,
                format!("{} Berhasil Dihapus", entity.label()),
                format!("{} telah dihapus dari sistem", entity.label()),
                3000,
            ),
            Notice::DeleteError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Menghapus {}", entity.label()),
                "Silakan coba lagi".to_string(),
                4000,
            ),
            Notice::RestoreSuccess(entity) => Alert::new(
                Level::Success,
                format!("{} Berhasil Dipulihkan", entity.label()),
                format!("{} telah dikembalikan", entity.label()),
                3000,
            ),
            Notice::RestoreError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Memulihkan {}", entity.label()),
                "Silakan coba lagi".to_string(),
                4000,
            ),
            Notice::Activated(entity) => Alert::new(
                Level::Success,
                format!("{} Diaktifkan", entity.label()),
                format!("{} sekarang aktif", entity.label()),
                2500,
            ),
            Notice::Deactivated(entity) => Alert::new(
                Level::Warning,
                format!("{} Dinonaktifkan", entity.label()),
                format!("{} sekarang tidak aktif", entity.label()),
                2500,
            ),
            Notice::StatusChangeError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Mengubah Status {}", entity.label()),
                "Silakan coba lagi".to_string(),
                4000,
            ),
            Notice::FetchError(entity) => Alert::new(
                Level::Error,
                format!("Gagal Memuat {}", entity.label()),
                "Periksa koneksi internet dan coba lagi".to_string(),
                4000,
            ),
            Notice::NetworkError => Alert::new(
                Level::Error,
                "Koneksi Bermasalah".to_string(),
                "Periksa koneksi internet Anda".to_string(),
                5000,
            ),
            Notice::ServerError => Alert::new(
                Level::Error,
                "Server Bermasalah".to_string(),
                "Silakan coba beberapa saat lagi".to_string(),
                5000,
            ),
            Notice::InvalidInput(issue) => validation_alert(issue),
            Notice::UploadSuccess { file_name } => Alert::new(
                Level::Success,
                "Upload Berhasil".to_string(),
                format!("{file_name} berhasil diunggah"),
                3000,
            ),
            Notice::UploadError { file_name } => Alert::new(
                Level::Error,
                "Upload Gagal".to_string(),
                format!("Gagal mengunggah {file_name}"),
                4000,
            ),
            Notice::FileTooBig { max_size } => Alert::new(
                Level::Error,
                "File Terlalu Besar".to_string(),
                format!("Ukuran file maksimal {max_size}"),
                4000,
            ),
            Notice::InvalidFileType { allowed } => Alert::new(
                Level::Error,
                "Tipe File Tidak Valid".to_string(),
                format!("Hanya file {allowed} yang diizinkan"),
                4000,
            ),
            Notice::BatchDeleteSuccess { count, entity } => Alert::new(
                Level::Success,
                "Hapus Massal Berhasil".to_string(),
                format!("{count} {} berhasil dihapus", entity.label_lower()),
                3000,
            ),
            Notice::BatchDeleteError { count, entity } => Alert::new(
                Level::Error,
                "Hapus Massal Gagal".to_string(),
                format!("Gagal menghapus {count} {}", entity.label_lower()),
                4000,
            ),
            Notice::ExportSuccess { entity, format } => Alert::new(
                Level::Success,
                "Export Berhasil".to_string(),
                format!("{} berhasil diexport ke format {format}", entity.label()),
                3000,
            ),
            Notice::ExportError(entity) => Alert::new(
                Level::Error,
                "Export Gagal".to_string(),
                format!("Gagal mengexport {}", entity.label()),
                4000,
            ),
            Notice::ImportSuccess { count, entity } => Alert::new(
                Level::Success,
                "Import Berhasil".to_string(),
                format!("{count} {} berhasil diimport", entity.label_lower()),
                3000,
            ),
            Notice::ImportError { message } => Alert::new(
                Level::Error,
                "Import Gagal".to_string(),
                message
                    .clone()
                    .unwrap_or_else(|| "Terjadi kesalahan saat import".to_string()),
                5000,
            ),
            Notice::AccessDenied { resource } => Alert::new(
                Level::Error,
                "Akses Ditolak".to_string(),
                format!("Anda tidak memiliki izin untuk mengakses {resource}"),
                4000,
            ),
            Notice::RoleChanged { role } => Alert::new(
                Level::Info,
                "Role Berubah".to_string(),
                format!("Role Anda telah berubah menjadi {role}"),
                3000,
            ),
            Notice::PermissionGranted { permission } => Alert::new(
                Level::Success,
                "Izin Diberikan".to_string(),
                format!("Anda telah diberikan {permission}"),
                3000,
            ),
            Notice::NewMessage { sender } => Alert::new(
                Level::Info,
                "Pesan Baru".to_string(),
                format!("Pesan baru dari {sender}"),
                4000,
            ),
            Notice::DataUpdated(entity) => Alert::new(
                Level::Info,
                format!("{} Diperbarui", entity.label()),
                format!("{} telah diperbarui oleh pengguna lain", entity.label()),
                3000,
            ),
            Notice::Notification { title, message } => {
                Alert::new(Level::Info, title.clone(), message.clone(), 4000)
            }
        }
    }

    /// Flashes this notice so the next rendered page displays it.
    pub fn send(self) {
        let alert = self.alert();
        let body = match serde_json::to_string(&alert) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to encode alert: {e}");
                alert.title.clone()
            }
        };
        match alert.level {
            Level::Success => FlashMessage::success(body).send(),
            Level::Error => FlashMessage::error(body).send(),
            Level::Warning => FlashMessage::warning(body).send(),
            Level::Info => FlashMessage::info(body).send(),
        }
    }
}

fn validation_alert(issue: &FormIssue) -> Alert {
    match issue {
        FormIssue::Required { field } => Alert::new(
            Level::Error,
            "Input Wajib".to_string(),
            format!("{field} harus diisi"),
            3000,
        ),
        FormIssue::Invalid { field } => Alert::new(
            Level::Error,
            "Input Tidak Valid".to_string(),
            format!("Format {} tidak benar", field.to_lowercase()),
            3000,
        ),
        FormIssue::TooShort { field, min } => Alert::new(
            Level::Error,
            "Input Terlalu Pendek".to_string(),
            format!("{field} minimal {min} karakter"),
            3000,
        ),
        FormIssue::TooLong { field, max } => Alert::new(
            Level::Error,
            "Input Terlalu Panjang".to_string(),
            format!("{field} maksimal {max} karakter"),
            3000,
        ),
        FormIssue::Mismatch { field } => Alert::new(
            Level::Error,
            "Input Tidak Cocok".to_string(),
            format!("{field} tidak cocok"),
            3000,
        ),
        FormIssue::Other(message) => Alert::new(
            Level::Error,
            "Input Tidak Valid".to_string(),
            message.clone(),
            3000,
        ),
    }
}

/// Decodes one incoming flash back into an [`Alert`].
///
/// Plain-text flashes degrade to a title-only alert at the message's level.
pub fn decode_alert(content: &str, level: FlashLevel) -> Alert {
    serde_json::from_str(content).unwrap_or_else(|_| {
        let level = Level::from(level);
        Alert {
            level,
            title: content.to_string(),
            description: String::new(),
            duration_ms: level.default_duration_ms(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_success_greets_by_name() {
        let alert = Notice::LoginSuccess {
            username: "Budi".to_string(),
        }
        .alert();
        assert_eq!(alert.level, Level::Success);
        assert_eq!(alert.title, "Selamat datang, Budi!");
        assert_eq!(alert.duration_ms, 3000);
    }

    #[test]
    fn login_error_falls_back_to_default_message() {
        let alert = Notice::LoginError { message: None }.alert();
        assert_eq!(alert.description, "Email atau password salah");
        assert_eq!(alert.duration_ms, 5000);
    }

    #[test]
    fn crud_copy_is_entity_scoped() {
        let alert = Notice::CreateSuccess(Entity::Category).alert();
        assert_eq!(alert.title, "Kategori Berhasil Dibuat");
        assert_eq!(alert.description, "Kategori baru telah ditambahkan");
    }

    #[test]
    fn update_description_lowercases_the_entity() {
        let alert = Notice::UpdateSuccess(Entity::Category).alert();
        assert_eq!(alert.description, "Perubahan kategori telah disimpan");
    }

    #[test]
    fn status_changes_dismiss_quickly() {
        let activated = Notice::Activated(Entity::User).alert();
        assert_eq!(activated.duration_ms, 2500);

        let deactivated = Notice::Deactivated(Entity::User).alert();
        assert_eq!(deactivated.level, Level::Warning);
        assert_eq!(deactivated.title, "User Dinonaktifkan");
    }

    #[test]
    fn validation_issue_renders_field_copy() {
        let alert = Notice::InvalidInput(FormIssue::TooShort {
            field: "Password",
            min: 8,
        })
        .alert();
        assert_eq!(alert.title, "Input Terlalu Pendek");
        assert_eq!(alert.description, "Password minimal 8 karakter");
    }

    #[test]
    fn role_change_is_informational() {
        let alert = Notice::RoleChanged {
            role: "admin".to_string(),
        }
        .alert();
        assert_eq!(alert.level, Level::Info);
        assert_eq!(alert.description, "Role Anda telah berubah menjadi admin");
    }

    #[test]
    fn alerts_round_trip_through_flash_json() {
        let alert = Notice::SessionExpired.alert();
        let body = serde_json::to_string(&alert).unwrap();
        assert_eq!(decode_alert(&body, FlashLevel::Warning), alert);
    }

    #[test]
    fn plain_text_flash_degrades_gracefully() {
        let alert = decode_alert("Kategori dibuat", FlashLevel::Success);
        assert_eq!(alert.title, "Kategori dibuat");
        assert_eq!(alert.description, "");
        assert_eq!(alert.level, Level::Success);
        assert_eq!(alert.duration_ms, 3000);
    }
}
