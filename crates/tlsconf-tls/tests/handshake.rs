//! Loopback handshakes driven by loaded configs

use std::path::PathBuf;
use tlsconf_tls::{load_tls_config, CaPool, Identity, ResolvedTlsConfig, TlsAcceptor, TlsConnector};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn server_config(mtls: bool) -> ResolvedTlsConfig {
    ResolvedTlsConfig {
        identity: Some(
            Identity::from_pem_files(&testdata("server.crt"), &testdata("server.key")).unwrap(),
        ),
        ca_pool: mtls.then(|| CaPool::from_pem_file(&testdata("ca.crt")).unwrap()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mutual_tls_handshake() {
    let acceptor = TlsAcceptor::new(&server_config(true)).unwrap();
    let connector =
        TlsConnector::new(&load_tls_config(testdata("tls_config.mtls.good.yml")).unwrap()).unwrap();

    let (client_io, server_io) = duplex(64 * 1024);

    let server = async move {
        let mut stream = acceptor.accept(server_io).await.unwrap();
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await.unwrap();
        stream.write_all(&buf).await.unwrap();
        stream.flush().await.unwrap();
        let (_, conn) = stream.get_ref();
        let peer_certs = conn.peer_certificates().map(<[_]>::len);
        peer_certs
    };
    let client = async move {
        let mut stream = connector.connect("127.0.0.1", client_io).await.unwrap();
        stream.write_all(b"ping").await.unwrap();
        stream.flush().await.unwrap();
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await.unwrap();
        buf
    };

    let (peer_certs, echoed) = tokio::join!(server, client);
    assert_eq!(&echoed, b"ping");
    assert_eq!(peer_certs, Some(1));
}

#[tokio::test]
async fn test_insecure_client_skips_verification() {
    let acceptor = TlsAcceptor::new(&server_config(false)).unwrap();
    let connector =
        TlsConnector::new(&load_tls_config(testdata("tls_config.insecure.good.json")).unwrap())
            .unwrap();

    let (client_io, server_io) = duplex(64 * 1024);

    let (server, client) = tokio::join!(
        acceptor.accept(server_io),
        connector.connect("localhost", client_io)
    );
    assert!(server.is_ok());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_mtls_server_rejects_anonymous_client() {
    let acceptor = TlsAcceptor::new(&server_config(true)).unwrap();
    let anonymous = ResolvedTlsConfig {
        ca_pool: Some(CaPool::from_pem_file(&testdata("ca.crt")).unwrap()),
        ..Default::default()
    };
    let connector = TlsConnector::new(&anonymous).unwrap();

    let (client_io, server_io) = duplex(64 * 1024);

    let (server, _client) = tokio::join!(
        acceptor.accept(server_io),
        connector.connect("localhost", client_io)
    );
    assert!(server.is_err());
}
