// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TLS trust assembly (§4.1). Builds an explicit rustls `ClientConfig`
//! instead of relying on reqwest's native-tls default, because the spec
//! requires precise control over which CA material is trusted and a
//! once-per-session insecure warning — neither is expressible through
//! reqwest's coarse `danger_accept_invalid_certs` alone.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore};

use crate::error::ArgoError;
use crate::model::Server;

/// Result of assembling trust material for one [`Server`].
#[derive(Debug)]
pub struct TlsTrust {
    pub client_config: ClientConfig,
    /// Set when `insecure=true` caused verification to be skipped; the
    /// caller surfaces this once per session (§4.1).
    pub insecure_warning: Option<String>,
}

/// Assemble a rustls `ClientConfig` following the CA precedence in §4.1:
/// explicit ca-cert file, then ca-path directory, then system roots unless
/// `insecure`.
pub fn build_trust(server: &Server) -> Result<TlsTrust, ArgoError> {
    if server.insecure {
        let config = insecure_client_config();
        return Ok(TlsTrust {
            client_config: config,
            insecure_warning: Some(
                "TLS certificate verification disabled (insecure=true)".to_string(),
            ),
        });
    }

    let mut roots = RootCertStore::empty();

    if let Some(ca_cert) = &server.ca_cert_path {
        load_ca_cert_file(ca_cert, &mut roots)?;
    } else if let Some(ca_dir) = &server.ca_path {
        load_ca_cert_dir(ca_dir, &mut roots)?;
    } else {
        roots.extend(webpki_roots());
    }

    let builder = ClientConfig::builder().with_root_certificates(roots);

    let config = match (&server.client_cert_path, &server.client_key_path) {
        (Some(cert_path), Some(key_path)) => {
            let cert_chain = load_cert_chain(cert_path)?;
            let key = load_private_key(key_path)?;
            builder
                .with_client_auth_cert(cert_chain, key)
                .map_err(|e| tls_config_failed(&format!("client certificate rejected: {e}")))?
        }
        (None, None) => builder.with_no_client_auth(),
        _ => {
            return Err(tls_config_failed(
                "both --client-cert and --client-cert-key must be set together",
            ))
        }
    };

    Ok(TlsTrust { client_config: config, insecure_warning: None })
}

fn load_ca_cert_file(path: &str, roots: &mut RootCertStore) -> Result<(), ArgoError> {
    let bytes = fs::read(path).map_err(|e| {
        tls_config_failed(&format!("could not read --cacert/--capath file {path}: {e}"))
    })?;
    let certs = parse_certs(&bytes)?;
    for cert in certs {
        roots.add(cert).map_err(|e| tls_config_failed(&format!("invalid CA certificate: {e}")))?;
    }
    Ok(())
}

fn load_ca_cert_dir(dir: &str, roots: &mut RootCertStore) -> Result<(), ArgoError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        tls_config_failed(&format!("could not read --capath directory {dir}: {e}"))
    })?;
    let mut loaded_any = false;
    for entry in entries.flatten() {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if ext != "pem" && ext != "crt" {
            continue;
        }
        let bytes = fs::read(&path)
            .map_err(|e| tls_config_failed(&format!("could not read {}: {e}", path.display())))?;
        for cert in parse_certs(&bytes)? {
            roots
                .add(cert)
                .map_err(|e| tls_config_failed(&format!("invalid CA certificate in {dir}: {e}")))?;
            loaded_any = true;
        }
    }
    if !loaded_any {
        return Err(tls_config_failed(&format!("no .pem/.crt files found in {dir}")));
    }
    Ok(())
}

fn load_cert_chain(path: &str) -> Result<Vec<CertificateDer<'static>>, ArgoError> {
    let bytes = fs::read(path)
        .map_err(|e| tls_config_failed(&format!("could not read client certificate {path}: {e}")))?;
    parse_certs(&bytes)
}

fn load_private_key(
    path: &str,
) -> Result<rustls::pki_types::PrivateKeyDer<'static>, ArgoError> {
    let bytes = fs::read(path)
        .map_err(|e| tls_config_failed(&format!("could not read client key {path}: {e}")))?;
    let mut reader = bytes.as_slice();
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| tls_config_failed(&format!("invalid client key {path}: {e}")))?
        .ok_or_else(|| tls_config_failed(&format!("no private key found in {path}")))
}

fn parse_certs(bytes: &[u8]) -> Result<Vec<CertificateDer<'static>>, ArgoError> {
    let mut reader = bytes;
    rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tls_config_failed(&format!("invalid certificate data: {e}")))
}

fn tls_config_failed(message: &str) -> ArgoError {
    ArgoError::tls(message).with_hint("see --cacert or --capath for CA trust configuration")
}

/// The Mozilla root program bundled via `webpki-roots`, used when neither
/// `--cacert` nor `--capath` is given (§4.1 step 3's default path).
fn webpki_roots() -> Vec<rustls::pki_types::TrustAnchor<'static>> {
    webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect()
}

fn insecure_client_config() -> ClientConfig {
    ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerify))
        .with_no_client_auth()
}

#[derive(Debug)]
struct NoVerify;

impl rustls::client::danger::ServerCertVerifier for NoVerify {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider().signature_verification_algorithms.supported_schemes()
    }
}

/// Check a path is readable before use, for [`Server::validate`]-style
/// fail-fast config checks.
pub fn path_is_readable(path: &str) -> bool {
    Path::new(path).is_file() || Path::new(path).is_dir()
}

#[cfg(test)]
#[path = "tls_tests.rs"]
mod tests;
