// src/client.rs

// Blocos de estado do lado do cliente: o reducer otimista do quadro e o
// cache de sincronização por polling. Nenhum dos dois conhece HTTP; o
// chamador injeta o fetch e despacha as ações.

pub mod board;
pub mod swr;
