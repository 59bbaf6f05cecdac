//! The fixed OpenSSL header set and its preprocessor flags.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Headers scanned, in `#include` order. Paths are relative to an include
/// directory.
pub const HEADER_FILES: &[&str] = &[
    "openssl/aes.h",
    "openssl/asn1.h",
    "openssl/asn1_mac.h",
    "openssl/asn1t.h",
    "openssl/bio.h",
    "openssl/blowfish.h",
    "openssl/bn.h",
    "openssl/buffer.h",
    "openssl/cast.h",
    "openssl/cmac.h",
    "openssl/comp.h",
    "openssl/conf_api.h",
    "openssl/conf.h",
    "openssl/crypto.h",
    "openssl/des.h",
    "openssl/dh.h",
    "openssl/dsa.h",
    "openssl/dso.h",
    "openssl/ebcdic.h",
    "openssl/ecdh.h",
    "openssl/ecdsa.h",
    "openssl/ec.h",
    "openssl/engine.h",
    "openssl/e_os2.h",
    "openssl/err.h",
    "openssl/evp.h",
    "openssl/hmac.h",
    "openssl/kssl.h",
    "openssl/lhash.h",
    "openssl/md2.h",
    "openssl/md4.h",
    "openssl/md5.h",
    "openssl/modes.h",
    "openssl/objects.h",
    "openssl/obj_mac.h",
    "openssl/ocsp.h",
    "openssl/opensslv.h",
    "openssl/ossl_typ.h",
    "openssl/pem2.h",
    "openssl/pem.h",
    "openssl/pkcs12.h",
    "openssl/pkcs7.h",
    "openssl/pqueue.h",
    "openssl/rand.h",
    "openssl/rc2.h",
    "openssl/rc4.h",
    "openssl/ripemd.h",
    "openssl/rsa.h",
    "openssl/safestack.h",
    "openssl/sha.h",
    "openssl/srp.h",
    "openssl/ssl23.h",
    "openssl/ssl2.h",
    "openssl/ssl.h",
    "openssl/stack.h",
    "openssl/store.h",
    "openssl/symhacks.h",
    "openssl/tls1.h",
    "openssl/ts.h",
    "openssl/txt_db.h",
    "openssl/ui_compat.h",
    "openssl/ui.h",
    "openssl/whrlpool.h",
    "openssl/x509.h",
    "openssl/x509v3.h",
    "openssl/x509_vfy.h",
];

/// Macros defined for the scan. Kept in step with the library's gyp build so
/// the scanned API matches the compiled one.
pub const DEFINES: &[&str] = &[
    "L_ENDIAN",
    "OPENSSL_THREADS",
    "PURIFY",
    "_REENTRANT",
    "OPENSSL_NO_DGRAM",
    "OPENSSL_NO_DTLS1",
    "OPENSSL_NO_SCTP",
    "OPENSSL_NO_SOCK",
    "OPENSSL_NO_RDRAND",
    "OPENSSL_NO_GOST",
    "OPENSSL_NO_HW_PADLOCK",
    "OPENSSL_NO_TTY",
];

/// Include directories, relative to the OpenSSL root.
pub const INCLUDE_DIRS: &[&str] = &["openssl/include", "config/piii", "tools/scan/include"];

/// Flags that always precede the defines: line markers off, no system
/// headers, and GNU attributes erased.
const BASE_FLAGS: &[&str] = &["-P", "-nostdinc", "-D__attribute__(x)="];

/// A set of headers rooted at an OpenSSL source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    root: PathBuf,
    headers: Vec<String>,
}

impl HeaderSet {
    /// The fixed header list under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_headers(root, HEADER_FILES.iter().map(ToString::to_string))
    }

    /// An explicit header list under `root`.
    pub fn with_headers(
        root: impl Into<PathBuf>,
        headers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            root: root.into(),
            headers: headers.into_iter().collect(),
        }
    }

    /// OpenSSL source root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Headers in include order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Absolute include directories.
    #[must_use]
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        INCLUDE_DIRS.iter().map(|dir| self.root.join(dir)).collect()
    }

    /// Full preprocessor argument list.
    #[must_use]
    pub fn cpp_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = BASE_FLAGS.iter().map(OsString::from).collect();
        args.extend(DEFINES.iter().map(|d| OsString::from(format!("-D{d}"))));
        args.extend(self.include_dirs().into_iter().map(|dir| {
            let mut arg = OsString::from("-I");
            arg.push(dir);
            arg
        }));
        args
    }

    /// One `#include <...>` line per header, newline-joined.
    #[must_use]
    pub fn include_blob(&self) -> String {
        self.headers
            .iter()
            .map(|h| format!("#include <{h}>"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
