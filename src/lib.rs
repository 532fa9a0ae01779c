//! fintslib — клиентское ядро FinTS/HBCI: инициализация диалога, переговоры
//! возможностей банка (BPD/UPD, TAN-методы) и разбор выписок (MT940).

pub mod banking;
pub mod config;
pub mod error;
pub mod interaction;
pub mod message;
pub mod model;
pub mod segment;
pub mod traits;

pub mod interactions {
    pub mod init;
    pub mod statement;
}

pub mod formats {
    pub mod mt940;
}
