//! Shared fixtures for unit tests.
//!
//! Two self-signed P-256 certificates with their `SubjectPublicKeyInfo`,
//! base64 encoded as they appear in `ds:X509Certificate` and
//! `dsig11:DEREncodedKeyValue`.

pub const CERT_A: &str = "MIIBmzCCAUGgAwIBAgIUY11dmgrE7+ZC4AjfGYCizV9Ev08wCgYIKoZIzj0EAwIwIjEgMB4GA1UEAwwXcHJlc2VudGVyLWEuZXhhbXBsZS5jb20wIBcNMjYxMDE1MDg0NTQyWhgPMjEyNjA5MjEwODQ1NDJaMCIxIDAeBgNVBAMMF3ByZXNlbnRlci1hLmV4YW1wbGUuY29tMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEU+OraTxgKg18UzQ1FzPPEJTPi8qTAXgO209mI77dvw4wK+a0hd2r05jUlZULTyCZ+wGeSI8Be2fGFRWhVtqYqqNTMFEwHQYDVR0OBBYEFGPRt18ITykPAUWxwrvzL1tfQKodMB8GA1UdIwQYMBaAFGPRt18ITykPAUWxwrvzL1tfQKodMA8GA1UdEwEB/wQFMAMBAf8wCgYIKoZIzj0EAwIDSAAwRQIhAMLFbMeL7ybEsv9nZxFhQL+phnojJU62pnnwb39Ve5cCAiAwrwTm/wG2pzuLzuGiXTV6bwTKTAIe8yOHt55lViCQLQ==";

pub const SPKI_A: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEU+OraTxgKg18UzQ1FzPPEJTPi8qTAXgO209mI77dvw4wK+a0hd2r05jUlZULTyCZ+wGeSI8Be2fGFRWhVtqYqg==";

pub const CERT_B: &str = "MIIBmzCCAUGgAwIBAgIULnvhPBSDAKOyepZwcyUb0027idgwCgYIKoZIzj0EAwIwIjEgMB4GA1UEAwwXcHJlc2VudGVyLWIuZXhhbXBsZS5jb20wIBcNMjYxMDE1MDg0NTQyWhgPMjEyNjA5MjEwODQ1NDJaMCIxIDAeBgNVBAMMF3ByZXNlbnRlci1iLmV4YW1wbGUuY29tMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEzpeaVhxra35HDMkdOnge5SSRZWcwXkwLFKx0vqrRP2QrYYauunA/e1+whSlQTyjHkGOcmQvDHjhFZXmbw9skMKNTMFEwHQYDVR0OBBYEFDkf0lVrNh8Eg/mGlQvzm9iaqxCSMB8GA1UdIwQYMBaAFDkf0lVrNh8Eg/mGlQvzm9iaqxCSMA8GA1UdEwEB/wQFMAMBAf8wCgYIKoZIzj0EAwIDSAAwRQIgT7lwb/C8pSinBlw/ww8CQRu3LiOIJjmJyQ+mnhNiThwCIQCFGs+iH3OCWQdNrMEqn3ZOcxNq3cW92tQQ2NfDSriLBw==";

pub const SPKI_B: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEzpeaVhxra35HDMkdOnge5SSRZWcwXkwLFKx0vqrRP2QrYYauunA/e1+whSlQTyjHkGOcmQvDHjhFZXmbw9skMA==";
