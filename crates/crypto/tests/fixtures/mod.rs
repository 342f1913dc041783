#![allow(dead_code)]

use bedrock_crypto::Certificate;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair,
    date_time_ymd,
};

pub struct Authority {
    pub certificate: Certificate,
    pub pem: String,
    issuer: Issuer<'static, KeyPair>,
}

fn names(common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "Bedrock Tests");
    dn.push(DnType::CommonName, common_name);
    dn
}

fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::default()).unwrap();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.distinguished_name = names(common_name);
    params
}

impl Authority {
    pub fn new(common_name: &str) -> Self {
        Self::from_params(ca_params(common_name))
    }

    /// A CA whose own validity period ended in 2001.
    pub fn expired(common_name: &str) -> Self {
        let mut params = ca_params(common_name);
        params.not_before = date_time_ymd(2000, 1, 1);
        params.not_after = date_time_ymd(2001, 1, 1);
        Self::from_params(params)
    }

    fn from_params(params: CertificateParams) -> Self {
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.clone().self_signed(&key_pair).unwrap();

        Self {
            certificate: Certificate::from_der(cert.der().to_vec()).unwrap(),
            pem: cert.pem(),
            issuer: Issuer::new(params, key_pair),
        }
    }

    pub fn issue(&self, common_name: &str) -> Certificate {
        let mut params = CertificateParams::new(vec![format!("{common_name}.test")]).unwrap();
        params.distinguished_name = names(common_name);
        self.sign(params)
    }

    pub fn issue_expired(&self, common_name: &str) -> Certificate {
        let mut params = CertificateParams::new(vec![format!("{common_name}.test")]).unwrap();
        params.distinguished_name = names(common_name);
        params.not_before = date_time_ymd(2000, 1, 1);
        params.not_after = date_time_ymd(2001, 1, 1);
        self.sign(params)
    }

    fn sign(&self, params: CertificateParams) -> Certificate {
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.signed_by(&key_pair, &self.issuer).unwrap();
        Certificate::from_der(cert.der().to_vec()).unwrap()
    }
}
